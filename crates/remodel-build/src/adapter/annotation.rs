use darling::FromMeta;
use remodel_schema::types::{CallbackKind, Cardinality, PropertyNameStyle, PropertyVisibility};

///
/// EntityMarker
///
/// Values carried by an entity marker annotation. `standard_dialect` records
/// which dialect declared it, since model-name defaulting differs between
/// the two.
///

#[derive(Clone, Debug, Default, Eq, FromMeta, PartialEq)]
pub struct EntityMarker {
    #[darling(default)]
    pub name: Option<String>,

    #[darling(default)]
    pub model: Option<String>,

    #[darling(default)]
    pub immutable: bool,

    #[darling(default)]
    pub stateless: bool,

    #[darling(default)]
    pub cacheable: Option<bool>,

    #[darling(default)]
    pub extendable: Option<bool>,

    #[darling(default)]
    pub name_style: Option<PropertyNameStyle>,

    #[darling(default)]
    pub visibility: Option<PropertyVisibility>,

    #[darling(default, skip)]
    pub standard_dialect: bool,
}

///
/// NameMarker
///
/// Single optional storage-name value, shared by table, view, and column
/// markers.
///

#[derive(Clone, Debug, Default, Eq, FromMeta, PartialEq)]
pub struct NameMarker {
    #[darling(default)]
    pub name: Option<String>,
}

///
/// Annotation
///
/// The typed annotation capability the core depends on. Both annotation
/// dialects resolve into this one closed set; nothing downstream ever
/// inspects attribute paths or raw values.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Annotation {
    Entity(EntityMarker),
    Superclass,
    Embeddable,

    Table(NameMarker),
    View(NameMarker),
    Column(NameMarker),

    Key,
    Generated,
    Version,
    Transient,
    Lazy,
    Nullable,
    ReadOnly,

    /// Value/immutable/data-style marker family.
    Immutable,

    Relationship(Cardinality),
    Callback(CallbackKind),

    /// Struct-declared supertypes, in declaration order.
    Extends(String),
    Implements(String),
}
