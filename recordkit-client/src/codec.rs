use recordkit_types::{QueryDescriptor, Record, RecordId};

/// Converts between a domain type and the container's [`Record`].
///
/// Implemented by the application for each entity type it stores.
/// `encode` must always succeed. `decode` returns `None` for records it
/// does not recognise; RecordKit reports those as decode failures.
///
/// ```
/// use recordkit_client::RecordCodec;
/// use recordkit_types::{Record, RecordId};
///
/// struct Note {
///     id: RecordId,
///     title: String,
/// }
///
/// impl RecordCodec for Note {
///     const RECORD_TYPE: &'static str = "Note";
///
///     fn record_id(&self) -> RecordId {
///         self.id.clone()
///     }
///
///     fn encode(&self) -> Record {
///         Record::new(self.id.clone(), Self::RECORD_TYPE).with_field("title", self.title.as_str())
///     }
///
///     fn decode(record: &Record) -> Option<Self> {
///         Some(Self {
///             id: record.id.clone(),
///             title: record.get_str("title")?.to_string(),
///         })
///     }
/// }
///
/// let query = Note::query().sort_by("title", true);
/// assert_eq!(query.record_type, "Note");
/// ```
pub trait RecordCodec: Sized + Send + Sync + 'static {
    /// The record type this entity is stored as.
    const RECORD_TYPE: &'static str;

    fn record_id(&self) -> RecordId;

    fn encode(&self) -> Record;

    fn decode(record: &Record) -> Option<Self>;

    /// A query for every record of this type.
    fn query() -> QueryDescriptor {
        QueryDescriptor::new(Self::RECORD_TYPE)
    }
}
