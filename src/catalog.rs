//! Signal aspect catalog.
//!
//! Maps the aspect names the simulator reports to the speed limit each aspect
//! imposes and its permissiveness ordinal. The ordinal is what the ATS device
//! knows the aspect by: it is sent in every signal beacon, and the table itself
//! is uploaded once per run as aspect table entries.

/// A signal aspect the ATS device knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalAspect {
    /// Name as reported by the simulator.
    pub name: &'static str,

    /// Human-readable name.
    pub label: &'static str,

    pub speed_limit_kph: u16,

    /// Permissiveness: 0 is stop, higher is more permissive.
    pub ordinal: u8,
}

impl SignalAspect {
    /// Payload of this aspect's entry in the device's aspect table.
    pub fn table_payload(&self) -> i32 {
        i32::from(self.ordinal) * 1000 + i32::from(self.speed_limit_kph)
    }
}

/// All aspects, in ordinal order.
pub static ASPECTS: [SignalAspect; 5] = [
    SignalAspect {
        name: "R",
        label: "stop",
        speed_limit_kph: 0,
        ordinal: 0,
    },
    SignalAspect {
        name: "YY",
        label: "caution",
        speed_limit_kph: 25,
        ordinal: 1,
    },
    SignalAspect {
        name: "Y",
        label: "attention",
        speed_limit_kph: 55,
        ordinal: 2,
    },
    SignalAspect {
        name: "YG",
        label: "reduced",
        speed_limit_kph: 80,
        ordinal: 3,
    },
    SignalAspect {
        name: "G",
        label: "clear",
        speed_limit_kph: 110,
        ordinal: 4,
    },
];

/// Look up an aspect by its reported name.
pub fn lookup(name: &str) -> Option<&'static SignalAspect> {
    ASPECTS.iter().find(|aspect| aspect.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_increase_with_permissiveness() {
        for pair in ASPECTS.windows(2) {
            assert!(pair[0].ordinal < pair[1].ordinal);
            assert!(pair[0].speed_limit_kph < pair[1].speed_limit_kph);
        }
        assert_eq!(ASPECTS[0].ordinal, 0);
    }

    #[test]
    fn lookup_by_name() {
        let aspect = lookup("YG").unwrap();
        assert_eq!(aspect.label, "reduced");
        assert_eq!(aspect.speed_limit_kph, 80);
        assert_eq!(aspect.ordinal, 3);
    }

    #[test]
    fn lookup_unknown_name() {
        assert!(lookup("B").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn table_payload_packs_ordinal_and_limit() {
        assert_eq!(lookup("R").unwrap().table_payload(), 0);
        assert_eq!(lookup("Y").unwrap().table_payload(), 2055);
        assert_eq!(lookup("G").unwrap().table_payload(), 4110);
    }
}
