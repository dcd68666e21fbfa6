use darling::FromMeta;
use derive_more::{Display, FromStr};
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use serde::Serialize;

///
/// Cardinality
///
/// Relationship shape between two mapped types. Declaration markers are
/// examined in a fixed priority order, not in variant order.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum Cardinality {
    ManyToMany,
    ManyToOne,
    OneToMany,
    OneToOne,
}

impl Cardinality {
    /// Marker examination order: first match wins.
    pub const PRIORITY: [Self; 4] = [
        Self::OneToOne,
        Self::OneToMany,
        Self::ManyToOne,
        Self::ManyToMany,
    ];

    #[must_use]
    pub const fn is_to_many(self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }
}

impl ToTokens for Cardinality {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ident = format_ident!("{self}");

        tokens.extend(quote!(::remodel::schema::types::Cardinality::#ident));
    }
}

///
/// EntityKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
pub enum EntityKind {
    Entity,
    Superclass,
    Embeddable,
}

impl EntityKind {
    #[must_use]
    pub const fn is_entity(self) -> bool {
        matches!(self, Self::Entity)
    }
}

///
/// ContainerShape
///
/// Closed set of recognized container families. Shapes are resolved from the
/// adapter's structural type model, never from substring matching on user
/// type names. Maps are tracked for accessor selection but are never
/// relationship collections.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
pub enum ContainerShape {
    List,
    Set,
    Map,
}

impl ContainerShape {
    #[must_use]
    pub const fn is_relation_collection(self) -> bool {
        matches!(self, Self::List | Self::Set)
    }
}

///
/// PropertyNameStyle
///
/// Accessor naming convention used by the generated implementation.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize)]
pub enum PropertyNameStyle {
    #[default]
    Bean,
    Fluent,
    FluentBean,
    None,
}

impl FromMeta for PropertyNameStyle {
    fn from_string(s: &str) -> Result<Self, darling::Error> {
        match s {
            "bean" => Ok(Self::Bean),
            "fluent" => Ok(Self::Fluent),
            "fluent_bean" => Ok(Self::FluentBean),
            "none" => Ok(Self::None),
            _ => Err(darling::Error::unknown_value(s)),
        }
    }
}

///
/// PropertyVisibility
///
/// Member visibility applied to generated accessors and state fields.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, FromStr, PartialEq, Serialize)]
pub enum PropertyVisibility {
    #[default]
    Private,
    Package,
    Protected,
    Public,
}

impl FromMeta for PropertyVisibility {
    fn from_string(s: &str) -> Result<Self, darling::Error> {
        s.parse::<Self>()
            .map_err(|_| darling::Error::unknown_value(s))
    }
}

///
/// CallbackKind
///
/// Lifecycle callback slots a mapped type may register methods for.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum CallbackKind {
    PostDelete,
    PostInsert,
    PostLoad,
    PostUpdate,
    PreDelete,
    PreInsert,
    PreUpdate,
}

impl ToTokens for CallbackKind {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ident = format_ident!("{self}");

        tokens.extend(quote!(::remodel::schema::types::CallbackKind::#ident));
    }
}
