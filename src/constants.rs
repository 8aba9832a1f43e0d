/// Constants used by the date normalizer.
pub mod dates {
    /// Day zero of the spreadsheet serial-date system (serial 1 is 1900-01-01).
    pub const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 31);
    /// Serial numbers above this are shifted back one day to undo the
    /// spreadsheet's fictitious 29 February 1900.
    pub const SERIAL_LEAP_BUG_THRESHOLD: f64 = 59.0;
    /// Earliest year accepted by the day-month-year conventions.
    pub const MIN_YEAR: i32 = 1900;
    /// Latest year accepted by the day-month-year conventions.
    pub const MAX_YEAR: i32 = 2100;
    /// Delimiters tried, in order, for day-month-year strings.
    pub const DAY_FIRST_DELIMITERS: [char; 3] = ['/', '-', '.'];
    /// Year-first formats tried when no day-first convention matches.
    pub const YEAR_FIRST_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
    /// Year-first timestamp formats tried after the plain date formats.
    pub const YEAR_FIRST_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
    /// The single canonical text form of a date.
    pub const CANONICAL_FORMAT: &str = "%d/%m/%Y";
}

/// Default header candidates per logical field, most specific first.
pub mod fields {
    /// Creator (user) header candidates.
    pub const CREATOR_PATTERNS: &[&str] = &[
        "Χρήστης δημιουργίας",
        "Χρήστης_δημιουργίας",
        "User",
        "user",
        "Χρήστης",
        "created by",
        "creator",
    ];
    /// Source channel header candidates.
    pub const SOURCE_PATTERNS: &[&str] = &[
        "Source Type",
        "Source_Type",
        "SourceType",
        "Source",
        "Type",
        "Πηγή",
        "source",
        "πηγή",
    ];
    /// Store/branch header candidates.
    pub const LOCATION_PATTERNS: &[&str] = &[
        "Υποκατάστημα",
        "Store",
        "Branch",
        "Κατάστημα",
        "Shop",
        "Location",
        "store",
        "κατάστημα",
    ];
    /// Creation-date header candidates.
    pub const DATE_PATTERNS: &[&str] = &[
        "Ημερομηνία δημιουργίας",
        "Ημερομηνία_δημιουργίας",
        "Date",
        "date",
        "Ημ/νία δημιουργίας",
        "Ημερομηνία",
        "ημερομηνία",
        "Ημέρα",
        "Ημερομηνία/Ωρα Εναρξης",
        "Ημερομηνία/Ώρα Έναρξης",
        "Start Date",
        "Start Time",
    ];
}

/// Defaults for the call-center creator heuristic.
pub mod call_center {
    /// Lower-cased substrings that mark a creator as a call-center agent.
    pub const SUBSTRINGS: &[&str] = &[
        "call_center",
        "callcenter",
        "call center",
        "cc_",
        "κέντρο",
        "kentro",
    ];
    /// Lower-cased prefixes that mark a creator as a call-center agent.
    pub const PREFIXES: &[&str] = &["cc"];
}

/// Constants used when shaping series for display.
pub mod charts {
    /// Maximum number of pie slices before the long tail is merged.
    pub const MAX_SOURCE_SLICES: usize = 7;
    /// Label of the merged long-tail slice.
    pub const OTHER_LABEL: &str = "Other";
    /// Placeholder label treated as "no value" by slice shaping.
    pub const UNKNOWN_LABEL: &str = "Unknown";
}

/// Constants used by the ingestion adapters.
pub mod ingestion {
    /// Header name given to blank header cells in a spreadsheet grid.
    pub const EMPTY_HEADER: &str = "__EMPTY";
    /// Byte-order mark occasionally left on the first CSV header.
    pub const UTF8_BOM: char = '\u{feff}';
    /// Lower-cased extensions read as spreadsheet workbooks.
    pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];
}
