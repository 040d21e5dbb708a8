use std::collections::HashMap;

use crate::units::kinds::UnitKind;

lazy_static::lazy_static! {
    /// SBML base kinds by name. These may be referenced from any unit
    /// expression without being declared. `liter` and `meter` are accepted
    /// as spellings of `litre` and `metre`.
    pub static ref BASE_KINDS: HashMap<&'static str, UnitKind> = {
        let mut m = HashMap::new();
        for kind in [
            UnitKind::Ampere,
            UnitKind::Avogadro,
            UnitKind::Becquerel,
            UnitKind::Candela,
            UnitKind::Coulomb,
            UnitKind::Dimensionless,
            UnitKind::Farad,
            UnitKind::Gram,
            UnitKind::Gray,
            UnitKind::Henry,
            UnitKind::Hertz,
            UnitKind::Item,
            UnitKind::Joule,
            UnitKind::Katal,
            UnitKind::Kelvin,
            UnitKind::Kilogram,
            UnitKind::Litre,
            UnitKind::Lumen,
            UnitKind::Lux,
            UnitKind::Metre,
            UnitKind::Mole,
            UnitKind::Newton,
            UnitKind::Ohm,
            UnitKind::Pascal,
            UnitKind::Radian,
            UnitKind::Second,
            UnitKind::Siemens,
            UnitKind::Sievert,
            UnitKind::Steradian,
            UnitKind::Tesla,
            UnitKind::Volt,
            UnitKind::Watt,
            UnitKind::Weber,
        ] {
            m.insert(kind.name(), kind);
        }
        m.insert("liter", UnitKind::Litre);
        m.insert("meter", UnitKind::Metre);
        m
    };

    /// Unit names understood when a primitive unit identifier is read as
    /// prefix + name, with the multiplier relative to the base kind.
    pub static ref KIND_MAPPINGS: HashMap<&'static str, (UnitKind, f64)> = {
        let mut m = HashMap::new();
        // Mole
        m.insert("mole", (UnitKind::Mole, 1.0));
        m.insert("mol", (UnitKind::Mole, 1.0));

        // Liter
        m.insert("liter", (UnitKind::Litre, 1.0));
        m.insert("litre", (UnitKind::Litre, 1.0));
        m.insert("l", (UnitKind::Litre, 1.0));

        // Meter
        m.insert("meter", (UnitKind::Metre, 1.0));
        m.insert("metre", (UnitKind::Metre, 1.0));
        m.insert("m", (UnitKind::Metre, 1.0));

        // Second
        m.insert("second", (UnitKind::Second, 1.0));
        m.insert("s", (UnitKind::Second, 1.0));

        // Minute
        m.insert("minute", (UnitKind::Second, 60.0));
        m.insert("min", (UnitKind::Second, 60.0));
        m.insert("mins", (UnitKind::Second, 60.0));
        m.insert("minutes", (UnitKind::Second, 60.0));

        // Hour
        m.insert("hour", (UnitKind::Second, 3600.0));
        m.insert("hours", (UnitKind::Second, 3600.0));
        m.insert("hr", (UnitKind::Second, 3600.0));
        m.insert("h", (UnitKind::Second, 3600.0));

        // Day
        m.insert("day", (UnitKind::Second, 86400.0));
        m.insert("days", (UnitKind::Second, 86400.0));
        m.insert("d", (UnitKind::Second, 86400.0));

        // Gram
        m.insert("gram", (UnitKind::Gram, 1.0));
        m.insert("g", (UnitKind::Gram, 1.0));

        // Items
        m.insert("item", (UnitKind::Item, 1.0));

        // Dimensionless
        m.insert("dimensionless", (UnitKind::Dimensionless, 1.0));

        // Kelvin
        m.insert("kelvin", (UnitKind::Kelvin, 1.0));
        m.insert("K", (UnitKind::Kelvin, 1.0));

        m
    };

    /// Decimal prefixes, longest first so that `micro` wins over `m`.
    pub static ref PREFIXES: Vec<(&'static str, i32)> = {
        let mut prefixes = vec![
            ("kilo", 3),
            ("k", 3),
            ("milli", -3),
            ("m", -3),
            ("micro", -6),
            ("mu", -6),
            ("u", -6),
            ("nano", -9),
            ("n", -9),
            ("pico", -12),
            ("p", -12),
            ("femto", -15),
            ("f", -15),
            ("atto", -18),
            ("a", -18),
        ];
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        prefixes
    };
}

/// Reads a primitive unit identifier as `[prefix]name`.
///
/// Returns the kind, the decimal scale and the multiplier, or `None` if the
/// identifier is neither a known name nor a prefixed known name.
pub fn parse_prefixed(token: &str) -> Option<(UnitKind, i32, f64)> {
    if let Some((kind, multiplier)) = KIND_MAPPINGS.get(token) {
        return Some((*kind, 0, *multiplier));
    }

    PREFIXES.iter().find_map(|(prefix, scale)| {
        token
            .strip_prefix(prefix)
            .and_then(|rest| KIND_MAPPINGS.get(rest))
            .map(|(kind, multiplier)| (*kind, *scale, *multiplier))
    })
}
