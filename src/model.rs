// sea-level densities in kg/m^3
pub const AIR_DENSITY: f64 = 1.225;
pub const BALLOON_DRAG_COEFFICIENT: f64 = 0.25;

// empirical fit of burst radius against balloon mass
pub const BURST_RADIUS_COEFFICIENT: f64 = 0.479;
pub const BURST_RADIUS_EXPONENT: f64 = 0.3115;

#[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gas {
    Helium,
    Hydrogen,
}

impl Gas {
    pub fn density(&self) -> f64 {
        match self {
            Gas::Helium => 0.1786,
            Gas::Hydrogen => 0.0899,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gas::Helium => "helium",
            Gas::Hydrogen => "hydrogen",
        }
    }
}

// all masses in grams, as read off a filling scale
#[derive(Clone, Copy, PartialEq, Debug, serde::Deserialize)]
pub struct CalculatorParams {
    pub payload_mass: f64,
    pub balloon_mass: f64,
    pub parachute_mass: f64,
    pub neck_lift: f64,
    pub gas: Gas,
}

#[derive(Clone, PartialEq, Debug)]
pub struct CalculationStep {
    pub name: String,
    pub formula: String,
    pub substitution: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Clone, PartialEq, Debug)]
pub struct CalculationBreakdown {
    pub steps: Vec<CalculationStep>,
    pub ascent_rate: f64,
    pub burst_altitude: f64,
}

pub fn calculate_balloon_performance(
    params: &CalculatorParams,
    launch_altitude: f64,
) -> Option<CalculationBreakdown> {
    if params.balloon_mass <= 0.0 {
        return None;
    }

    let mut steps = vec![];

    let total_mass = (params.payload_mass + params.balloon_mass + params.parachute_mass) / 1000.0;
    steps.push(CalculationStep {
        name: String::from("total system mass"),
        formula: String::from("(payload + balloon + parachute) / 1000"),
        substitution: format!(
            "({:.0} + {:.0} + {:.0}) / 1000",
            params.payload_mass, params.balloon_mass, params.parachute_mass
        ),
        value: total_mass,
        unit: String::from("kg"),
    });

    let gross_lift = total_mass + params.neck_lift / 1000.0;
    steps.push(CalculationStep {
        name: String::from("gross lift"),
        formula: String::from("total mass + neck lift / 1000"),
        substitution: format!("{:.3} + {:.0} / 1000", total_mass, params.neck_lift),
        value: gross_lift,
        unit: String::from("kg"),
    });

    let lift_per_cubic_meter = AIR_DENSITY - params.gas.density();
    steps.push(CalculationStep {
        name: String::from("gas lift per cubic meter"),
        formula: String::from("air density - gas density"),
        substitution: format!("{:.3} - {:.4}", AIR_DENSITY, params.gas.density()),
        value: lift_per_cubic_meter,
        unit: String::from("kg/m^3"),
    });

    let launch_volume = gross_lift / lift_per_cubic_meter;
    steps.push(CalculationStep {
        name: String::from("launch gas volume"),
        formula: String::from("gross lift / lift per cubic meter"),
        substitution: format!("{:.3} / {:.4}", gross_lift, lift_per_cubic_meter),
        value: launch_volume,
        unit: String::from("m^3"),
    });

    let launch_radius = (3.0 * launch_volume / (4.0 * std::f64::consts::PI)).powf(1.0 / 3.0);
    steps.push(CalculationStep {
        name: String::from("launch radius"),
        formula: String::from("(3 V / 4 pi)^(1/3)"),
        substitution: format!("(3 * {:.3} / 4 pi)^(1/3)", launch_volume),
        value: launch_radius,
        unit: String::from("m"),
    });

    let net_lift_force = params.neck_lift / 1000.0 * crate::atmosphere::STANDARD_GRAVITY;
    let ascent_rate = (2.0 * net_lift_force
        / (AIR_DENSITY
            * std::f64::consts::PI
            * launch_radius.powi(2)
            * BALLOON_DRAG_COEFFICIENT))
        .sqrt();
    steps.push(CalculationStep {
        name: String::from("ascent rate"),
        formula: String::from("sqrt(2 F / (rho pi r^2 Cd))"),
        substitution: format!(
            "sqrt(2 * {:.3} / ({:.3} * pi * {:.3}^2 * {:.2}))",
            net_lift_force, AIR_DENSITY, launch_radius, BALLOON_DRAG_COEFFICIENT
        ),
        value: ascent_rate,
        unit: String::from("m/s"),
    });

    let burst_radius = BURST_RADIUS_COEFFICIENT * params.balloon_mass.powf(BURST_RADIUS_EXPONENT);
    steps.push(CalculationStep {
        name: String::from("burst radius"),
        formula: format!(
            "{:} * balloon mass^{:}",
            BURST_RADIUS_COEFFICIENT, BURST_RADIUS_EXPONENT
        ),
        substitution: format!(
            "{:} * {:.0}^{:}",
            BURST_RADIUS_COEFFICIENT, params.balloon_mass, BURST_RADIUS_EXPONENT
        ),
        value: burst_radius,
        unit: String::from("m"),
    });

    let burst_volume = 4.0 / 3.0 * std::f64::consts::PI * burst_radius.powi(3);
    steps.push(CalculationStep {
        name: String::from("burst volume"),
        formula: String::from("4/3 pi r^3"),
        substitution: format!("4/3 pi * {:.3}^3", burst_radius),
        value: burst_volume,
        unit: String::from("m^3"),
    });

    // combined gas law between launch and the cold stratosphere
    let launch_pressure = crate::atmosphere::altitude_to_pressure(launch_altitude);
    let burst_pressure = launch_pressure * (launch_volume / burst_volume)
        * (crate::atmosphere::TROPOPAUSE_TEMPERATURE / crate::atmosphere::SEA_LEVEL_TEMPERATURE);
    steps.push(CalculationStep {
        name: String::from("burst pressure"),
        formula: String::from("launch pressure * (V_launch / V_burst) * (T_strat / T_sea)"),
        substitution: format!(
            "{:.2} * ({:.3} / {:.3}) * ({:.2} / {:.2})",
            launch_pressure,
            launch_volume,
            burst_volume,
            crate::atmosphere::TROPOPAUSE_TEMPERATURE,
            crate::atmosphere::SEA_LEVEL_TEMPERATURE
        ),
        value: burst_pressure,
        unit: String::from("hPa"),
    });

    let burst_altitude = crate::atmosphere::pressure_to_altitude(burst_pressure);
    steps.push(CalculationStep {
        name: String::from("burst altitude"),
        formula: String::from("pressure_to_altitude(burst pressure)"),
        substitution: format!("pressure_to_altitude({:.2})", burst_pressure),
        value: burst_altitude,
        unit: String::from("m"),
    });

    // degenerate inputs surface here as non-finite or negative outputs
    if !ascent_rate.is_finite()
        || ascent_rate < 0.0
        || !burst_altitude.is_finite()
        || burst_altitude < 0.0
    {
        return None;
    }

    Some(CalculationBreakdown {
        steps,
        ascent_rate,
        burst_altitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CalculatorParams {
        CalculatorParams {
            payload_mass: 800.0,
            balloon_mass: 1200.0,
            parachute_mass: 250.0,
            neck_lift: 1500.0,
            gas: Gas::Helium,
        }
    }

    #[test]
    fn test_plausible_outputs() {
        let breakdown = calculate_balloon_performance(&params(), 1600.0).unwrap();

        assert!(breakdown.ascent_rate > 2.0 && breakdown.ascent_rate < 10.0);
        assert!(breakdown.burst_altitude > 20000.0 && breakdown.burst_altitude < 40000.0);
        assert_eq!(breakdown.steps.len(), 10);
    }

    #[test]
    fn test_deterministic() {
        let first = calculate_balloon_performance(&params(), 1600.0).unwrap();
        let second = calculate_balloon_performance(&params(), 1600.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_balloon_mass_fails() {
        let mut params = params();
        params.balloon_mass = 0.0;
        assert!(calculate_balloon_performance(&params, 1600.0).is_none());
    }

    #[test]
    fn test_negative_neck_lift_fails() {
        let mut params = params();
        params.neck_lift = -500.0;
        assert!(calculate_balloon_performance(&params, 1600.0).is_none());
    }

    #[test]
    fn test_hydrogen_lifts_more() {
        let helium = calculate_balloon_performance(&params(), 1600.0).unwrap();

        let mut hydrogen_params = params();
        hydrogen_params.gas = Gas::Hydrogen;
        let hydrogen = calculate_balloon_performance(&hydrogen_params, 1600.0).unwrap();

        // more lift per cubic meter means less gas volume for the same
        // neck lift, a smaller balloon, and a faster climb
        assert!(hydrogen.ascent_rate > helium.ascent_rate);
    }
}
