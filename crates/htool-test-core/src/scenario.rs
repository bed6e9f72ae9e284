//! Scenario dispatch table.
//!
//! Each test case name maps to a fixed set of checks. Adding a scenario means
//! adding an entry here; the evaluator itself is generic.

/// Suite name that selects the Mach-O scenario family.
pub const MACHO_SUITE: &str = "macho-tests";

/// Required info marker and the message reported when it is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerCheck {
    pub marker: &'static str,
    pub failure: &'static str,
}

/// A named test case family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    /// Test case name used in the manifest.
    pub case_name: &'static str,
    /// Info markers that must all appear.
    pub markers: &'static [MarkerCheck],
    /// Compare the architecture line against the expected string.
    pub architecture_check: bool,
    /// A clean run is expected to exit with status 0.
    pub expects_clean_exit: bool,
}

const FILE_LOADED: MarkerCheck = MarkerCheck {
    marker: "File successfully loaded",
    failure: "Failed to load file",
};

const MACHO_OUTPUT: [MarkerCheck; 4] = [
    FILE_LOADED,
    MarkerCheck {
        marker: "Printed Mach-O Header",
        failure: "Failed to print Mach-O Header",
    },
    MarkerCheck {
        marker: "Printed Mach-O Segment Commands",
        failure: "Failed to print Mach-O Segment Commands",
    },
    MarkerCheck {
        marker: "Printed Mach-O Load Commands",
        failure: "Failed to print Mach-O Load Commands",
    },
];

const FAT_OUTPUT: [MarkerCheck; 2] = [
    FILE_LOADED,
    MarkerCheck {
        marker: "Printed FAT Header",
        failure: "Failed to print FAT Header",
    },
];

const INVALID_MACHO: [MarkerCheck; 1] = [MarkerCheck {
    marker: "File could not be loaded",
    failure: "Failed to detect invalid Mach-O file",
}];

const NO_FILE: [MarkerCheck; 1] = [MarkerCheck {
    marker: "File does not exist",
    failure: "Failed to detect nonexistent file",
}];

/// Scenarios of the `macho-tests` suite.
pub static MACHO_SCENARIOS: &[Scenario] = &[
    Scenario {
        case_name: "macho-test_valid-macho-file",
        markers: &MACHO_OUTPUT,
        architecture_check: false,
        expects_clean_exit: true,
    },
    Scenario {
        case_name: "macho-test_valid-fat-no-arch",
        markers: &FAT_OUTPUT,
        architecture_check: false,
        expects_clean_exit: true,
    },
    Scenario {
        case_name: "macho-test_valid-fat-with-arch",
        markers: &MACHO_OUTPUT,
        architecture_check: true,
        expects_clean_exit: true,
    },
    Scenario {
        case_name: "macho-test_invalid-macho",
        markers: &INVALID_MACHO,
        architecture_check: false,
        expects_clean_exit: false,
    },
    Scenario {
        case_name: "macho-test_no-file",
        markers: &NO_FILE,
        architecture_check: false,
        expects_clean_exit: false,
    },
];

/// Scenario table for a suite family, or `None` if the suite is not recognised.
#[must_use]
pub fn scenarios_for_suite(suite_name: &str) -> Option<&'static [Scenario]> {
    match suite_name {
        MACHO_SUITE => Some(MACHO_SCENARIOS),
        _ => None,
    }
}

/// Look up a scenario by test case name within a table.
#[must_use]
pub fn find_scenario(table: &'static [Scenario], case_name: &str) -> Option<&'static Scenario> {
    table.iter().find(|s| s.case_name == case_name)
}
