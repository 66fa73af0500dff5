// three-regime standard atmosphere; regime anchors are derived from the
// regime below so both seams are continuous
pub const SEA_LEVEL_PRESSURE: f64 = 1013.25;
pub const SEA_LEVEL_TEMPERATURE: f64 = 288.15;
pub const TROPOPAUSE_TEMPERATURE: f64 = 216.65;
pub const TROPOSPHERE_LAPSE_RATE: f64 = 0.0065;
pub const UPPER_STRATOSPHERE_LAPSE_RATE: f64 = 0.001;
pub const TROPOPAUSE_ALTITUDE: f64 = 11000.0;
pub const ISOTHERMAL_TOP_ALTITUDE: f64 = 20000.0;

pub const STANDARD_GRAVITY: f64 = 9.80665;
const DRY_AIR_GAS_CONSTANT: f64 = 287.053;

lazy_static::lazy_static! {
    static ref BAROMETRIC_EXPONENT: f64 =
        STANDARD_GRAVITY / (DRY_AIR_GAS_CONSTANT * TROPOSPHERE_LAPSE_RATE);
    static ref UPPER_STRATOSPHERE_EXPONENT: f64 =
        STANDARD_GRAVITY / (DRY_AIR_GAS_CONSTANT * UPPER_STRATOSPHERE_LAPSE_RATE);
    static ref ISOTHERMAL_SCALE_HEIGHT: f64 =
        DRY_AIR_GAS_CONSTANT * TROPOPAUSE_TEMPERATURE / STANDARD_GRAVITY;

    // ~226.32 hPa and ~54.74 hPa
    pub static ref TROPOPAUSE_PRESSURE: f64 = altitude_to_pressure(TROPOPAUSE_ALTITUDE);
    pub static ref ISOTHERMAL_TOP_PRESSURE: f64 = altitude_to_pressure(ISOTHERMAL_TOP_ALTITUDE);
}

pub fn altitude_to_pressure(altitude: f64) -> f64 {
    if altitude <= TROPOPAUSE_ALTITUDE {
        SEA_LEVEL_PRESSURE
            * (1.0 - TROPOSPHERE_LAPSE_RATE * altitude / SEA_LEVEL_TEMPERATURE)
                .powf(*BAROMETRIC_EXPONENT)
    } else if altitude <= ISOTHERMAL_TOP_ALTITUDE {
        *TROPOPAUSE_PRESSURE
            * (-(altitude - TROPOPAUSE_ALTITUDE) / *ISOTHERMAL_SCALE_HEIGHT).exp()
    } else {
        *ISOTHERMAL_TOP_PRESSURE
            * (TROPOPAUSE_TEMPERATURE
                / (TROPOPAUSE_TEMPERATURE
                    + UPPER_STRATOSPHERE_LAPSE_RATE * (altitude - ISOTHERMAL_TOP_ALTITUDE)))
                .powf(*UPPER_STRATOSPHERE_EXPONENT)
    }
}

pub fn pressure_to_altitude(pressure: f64) -> f64 {
    if pressure >= *TROPOPAUSE_PRESSURE {
        SEA_LEVEL_TEMPERATURE / TROPOSPHERE_LAPSE_RATE
            * (1.0 - (pressure / SEA_LEVEL_PRESSURE).powf(1.0 / *BAROMETRIC_EXPONENT))
    } else if pressure >= *ISOTHERMAL_TOP_PRESSURE {
        TROPOPAUSE_ALTITUDE + *ISOTHERMAL_SCALE_HEIGHT * (*TROPOPAUSE_PRESSURE / pressure).ln()
    } else {
        ISOTHERMAL_TOP_ALTITUDE
            + TROPOPAUSE_TEMPERATURE / UPPER_STRATOSPHERE_LAPSE_RATE
                * ((*ISOTHERMAL_TOP_PRESSURE / pressure).powf(1.0 / *UPPER_STRATOSPHERE_EXPONENT)
                    - 1.0)
    }
}
