/// Column header exactly as it appears in the source export.
/// Examples: `Χρήστης δημιουργίας`, `Source Type`, `user_name`
pub type ColumnName = String;
/// Candidate header pattern used to resolve a logical field.
/// Examples: `Source Type`, `Υποκατάστημα`, `created by`
pub type FieldPattern = String;
/// Resolved dimension value used as an aggregation key.
/// Examples: `k_tsipasis`, `SP4`, `ΓΛΥΚΑ ΝΕΡΑ- Λ.ΛΑΥΡΙΟΥ 81`
pub type Label = String;
/// Creator (user) name as exported by the booking system.
/// Examples: `s_sarellis`, `call_center_agent1`
pub type CreatorName = String;
/// Source channel name.
/// Examples: `SP4`, `OnlineOSB`
pub type SourceName = String;
/// Substring or prefix used by the call-center heuristic.
/// Examples: `call_center`, `cc_`, `κέντρο`
pub type MatchToken = String;
