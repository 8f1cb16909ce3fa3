/// Class-level metadata shared by every base record type.
///
/// A base record is one row of a flat extract loaded verbatim into the store.
/// The trait tells readers which table the record lives in by default and
/// which columns must exist before the table can be read.
pub trait SourceRecord {
    /// Default table name in the store (e.g. "purchases")
    fn collection_name() -> &'static str;

    /// Columns the reader touches, spelled as in the source file header
    fn required_columns() -> &'static [&'static str];
}
