//! Column layout of the exoplanet dataset

/// Planet name
pub const PL_NAME: &str = "pl_name";
/// Discovery year
pub const DISC_YEAR: &str = "disc_year";
/// Discovery method
pub const DISCOVERY_METHOD: &str = "discoverymethod";
/// Planet radius in Earth radii
pub const PL_RADE: &str = "pl_rade";
/// Planet mass in Earth masses
pub const PL_BMASSE: &str = "pl_bmasse";
/// Default parameter set flag
pub const DEFAULT_FLAG: &str = "default_flag";
/// Archive disposition, used as the class label
pub const DISPOSITION: &str = "disposition";

/// Columns guaranteed to exist after loading, in archive order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    PL_NAME,
    DISC_YEAR,
    DISCOVERY_METHOD,
    PL_RADE,
    PL_BMASSE,
    DEFAULT_FLAG,
    DISPOSITION,
];

/// Feature pair used when the table has fewer than two numeric columns.
pub const DEFAULT_FEATURES: [&str; 2] = [PL_RADE, PL_BMASSE];

/// Label column
pub const LABEL_COLUMN: &str = DISPOSITION;

/// Substitute for absent labels
pub const UNKNOWN_LABEL: &str = "UNKNOWN";
