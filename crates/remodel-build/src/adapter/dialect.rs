use crate::adapter::{Annotation, EntityMarker, NameMarker};
use darling::{FromMeta, ast::NestedMeta};
use remodel_schema::types::{CallbackKind, Cardinality};
use syn::{Attribute, Meta};

// Attribute paths come in two parallel dialects that are fully equivalent
// aliases: the native one (bare paths) and the standard-persistence one
// (`persist::`-prefixed). Both resolve into the same typed annotation set,
// so everything downstream sees one merged candidate pool.

/// Resolve one attribute into a typed annotation. Unrecognized paths (doc
/// comments, derives, third-party attributes) resolve to `None`.
pub fn resolve_annotation(attr: &Attribute) -> Result<Option<Annotation>, darling::Error> {
    let path = path_string(attr);

    let annotation = match path.as_str() {
        "entity" => Some(Annotation::Entity(entity_marker(attr, false)?)),
        "persist::entity" => Some(Annotation::Entity(entity_marker(attr, true)?)),

        "superclass" | "persist::mapped_superclass" => Some(Annotation::Superclass),
        "embedded" | "persist::embeddable" => Some(Annotation::Embeddable),

        "table" | "persist::table" => Some(Annotation::Table(name_marker(attr)?)),
        "view" => Some(Annotation::View(name_marker(attr)?)),
        "column" | "persist::column" => Some(Annotation::Column(name_marker(attr)?)),

        "key" | "persist::id" => Some(Annotation::Key),
        "generated" | "persist::generated_value" => Some(Annotation::Generated),
        "version" | "persist::version" => Some(Annotation::Version),
        "transient" | "persist::transient" => Some(Annotation::Transient),

        "lazy" => Some(Annotation::Lazy),
        "nullable" => Some(Annotation::Nullable),
        "read_only" => Some(Annotation::ReadOnly),

        // Recognized immutable/value/data marker family.
        "immutable" | "value" | "data" => Some(Annotation::Immutable),

        "one_to_one" | "persist::one_to_one" => {
            Some(Annotation::Relationship(Cardinality::OneToOne))
        }
        "one_to_many" | "persist::one_to_many" => {
            Some(Annotation::Relationship(Cardinality::OneToMany))
        }
        "many_to_one" | "persist::many_to_one" => {
            Some(Annotation::Relationship(Cardinality::ManyToOne))
        }
        "many_to_many" | "persist::many_to_many" => {
            Some(Annotation::Relationship(Cardinality::ManyToMany))
        }

        "pre_insert" | "persist::pre_persist" => {
            Some(Annotation::Callback(CallbackKind::PreInsert))
        }
        "post_insert" | "persist::post_persist" => {
            Some(Annotation::Callback(CallbackKind::PostInsert))
        }
        "pre_update" | "persist::pre_update" => Some(Annotation::Callback(CallbackKind::PreUpdate)),
        "post_update" | "persist::post_update" => {
            Some(Annotation::Callback(CallbackKind::PostUpdate))
        }
        "pre_delete" | "persist::pre_remove" => Some(Annotation::Callback(CallbackKind::PreDelete)),
        "post_delete" | "persist::post_remove" => {
            Some(Annotation::Callback(CallbackKind::PostDelete))
        }
        "post_load" | "persist::post_load" => Some(Annotation::Callback(CallbackKind::PostLoad)),

        "extends" => Some(Annotation::Extends(path_argument(attr)?)),
        "implements" => Some(Annotation::Implements(path_argument(attr)?)),

        _ => None,
    };

    Ok(annotation)
}

fn path_string(attr: &Attribute) -> String {
    attr.path()
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

fn entity_marker(attr: &Attribute, standard_dialect: bool) -> Result<EntityMarker, darling::Error> {
    let mut marker = match &attr.meta {
        Meta::Path(_) => EntityMarker::default(),
        Meta::List(list) => {
            let items = NestedMeta::parse_meta_list(list.tokens.clone())?;
            EntityMarker::from_list(&items)?
        }
        Meta::NameValue(nv) => {
            return Err(darling::Error::unsupported_format("name-value").with_span(nv));
        }
    };
    marker.standard_dialect = standard_dialect;

    Ok(marker)
}

fn name_marker(attr: &Attribute) -> Result<NameMarker, darling::Error> {
    match &attr.meta {
        Meta::Path(_) => Ok(NameMarker::default()),
        Meta::List(list) => {
            let items = NestedMeta::parse_meta_list(list.tokens.clone())?;
            NameMarker::from_list(&items)
        }
        Meta::NameValue(nv) => Err(darling::Error::unsupported_format("name-value").with_span(nv)),
    }
}

// `#[extends(path::To)]` / `#[implements(path::To)]`
fn path_argument(attr: &Attribute) -> Result<String, darling::Error> {
    let path: syn::Path = attr
        .parse_args()
        .map_err(|e| darling::Error::custom(e).with_span(attr))?;

    Ok(path
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>()
        .join("::"))
}
