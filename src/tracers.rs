// gridcompare/src/tracers.rs

use crate::errors::ErrorKind;
use crate::grid::Grid;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Species read from model output. Raw values are volume mixing ratios
/// (mol/mol) except `Temperature`, which is already in kelvin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tracer {
    O3,
    CO,
    NO,
    NO2,
    NOx,
    HNO3,
    N2O,
    CH4,
    H2O,
    CH2O,
    SO2,
    Temperature,
}

/// Display name, output units and the conversion from raw model units.
#[derive(Clone, Copy, Debug)]
pub struct UnitConversion {
    pub tracer: Tracer,
    pub name: &'static str,
    pub units: &'static str,
    convert: fn(f64) -> f64,
}

impl UnitConversion {
    const fn new(
        tracer: Tracer,
        name: &'static str,
        units: &'static str,
        convert: fn(f64) -> f64,
    ) -> Self {
        Self {
            tracer,
            name,
            units,
            convert,
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        (self.convert)(value)
    }
}

fn to_ppmv(vmr: f64) -> f64 {
    vmr * 1e6
}

fn to_ppbv(vmr: f64) -> f64 {
    vmr * 1e9
}

fn to_pptv(vmr: f64) -> f64 {
    vmr * 1e12
}

fn unchanged(value: f64) -> f64 {
    value
}

// Indexed by `Tracer as usize`.
static CONVERSIONS: [UnitConversion; 12] = [
    UnitConversion::new(Tracer::O3, "O3", "ppbv", to_ppbv),
    UnitConversion::new(Tracer::CO, "CO", "ppbv", to_ppbv),
    UnitConversion::new(Tracer::NO, "NO", "pptv", to_pptv),
    UnitConversion::new(Tracer::NO2, "NO2", "pptv", to_pptv),
    UnitConversion::new(Tracer::NOx, "NOx", "pptv", to_pptv),
    UnitConversion::new(Tracer::HNO3, "HNO3", "pptv", to_pptv),
    UnitConversion::new(Tracer::N2O, "N2O", "ppbv", to_ppbv),
    UnitConversion::new(Tracer::CH4, "CH4", "ppmv", to_ppmv),
    UnitConversion::new(Tracer::H2O, "H2O", "ppmv", to_ppmv),
    UnitConversion::new(Tracer::CH2O, "CH2O", "pptv", to_pptv),
    UnitConversion::new(Tracer::SO2, "SO2", "pptv", to_pptv),
    UnitConversion::new(Tracer::Temperature, "T", "K", unchanged),
];

impl Tracer {
    pub const ALL: [Tracer; 12] = [
        Tracer::O3,
        Tracer::CO,
        Tracer::NO,
        Tracer::NO2,
        Tracer::NOx,
        Tracer::HNO3,
        Tracer::N2O,
        Tracer::CH4,
        Tracer::H2O,
        Tracer::CH2O,
        Tracer::SO2,
        Tracer::Temperature,
    ];

    pub fn conversion(&self) -> &'static UnitConversion {
        &CONVERSIONS[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.conversion().name
    }

    pub fn units(&self) -> &'static str {
        self.conversion().units
    }

    /// Convert a raw field to display units. NaN and fill values (magnitude
    /// at or above `fill_threshold`) pass through untouched so they can
    /// still be masked later.
    pub fn convert(&self, grid: &Grid, fill_threshold: f64) -> Grid {
        let conversion = self.conversion();
        grid.mapv(|v| {
            if v.is_nan() || v.abs() >= fill_threshold {
                v
            } else {
                conversion.apply(v)
            }
        })
    }
}

impl fmt::Display for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Tracer {
    type Err = TracerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("temperature") {
            return Ok(Tracer::Temperature);
        }
        CONVERSIONS
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(wanted))
            .map(|c| c.tracer)
            .ok_or_else(|| TracerError::Unknown(wanted.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum TracerError {
    #[error("unknown tracer: {0}")]
    Unknown(String),
}

impl TracerError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{CoordinateAxis, LongitudeConvention};
    use ndarray::array;

    #[test]
    fn test_table_is_indexed_by_variant() {
        for tracer in Tracer::ALL {
            assert_eq!(tracer.conversion().tracer, tracer);
        }
    }

    #[test]
    fn test_conversions() {
        assert!((Tracer::O3.conversion().apply(4e-8) - 40.).abs() < 1e-9);
        assert!((Tracer::CH4.conversion().apply(1.8e-6) - 1.8).abs() < 1e-12);
        assert!((Tracer::NO.conversion().apply(2e-11) - 20.).abs() < 1e-9);
        assert_eq!(Tracer::Temperature.conversion().apply(250.), 250.);
        assert_eq!(Tracer::O3.units(), "ppbv");
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("o3".parse::<Tracer>().unwrap(), Tracer::O3);
        assert_eq!(" NOX ".parse::<Tracer>().unwrap(), Tracer::NOx);
        assert_eq!("Temperature".parse::<Tracer>().unwrap(), Tracer::Temperature);
        assert_eq!("t".parse::<Tracer>().unwrap(), Tracer::Temperature);
        for tracer in Tracer::ALL {
            assert_eq!(tracer.to_string().parse::<Tracer>().unwrap(), tracer);
        }
        assert!(matches!(
            "PAN".parse::<Tracer>(),
            Err(TracerError::Unknown(name)) if name == "PAN"
        ));
    }

    #[test]
    fn test_convert_preserves_fill_values() {
        let lat = CoordinateAxis::latitude(vec![0.]).unwrap();
        let lon = CoordinateAxis::longitude(
            vec![0., 120., 240.],
            Some(LongitudeConvention::ZeroTo360),
        )
        .unwrap();
        let grid = Grid::from_2d(array![[3e-8, 1e15, f64::NAN]], lat, lon).unwrap();
        let converted = Tracer::O3.convert(&grid, 1e9);
        assert!((converted.data()[[0, 0]] - 30.).abs() < 1e-9);
        assert_eq!(converted.data()[[0, 1]], 1e15);
        assert!(converted.data()[[0, 2]].is_nan());
        assert_eq!(converted.axes(), grid.axes());
    }
}
