//! Generated-type and accessor naming.

use convert_case::{Case, Casing};
use remodel_schema::{
    TABLE_PREFIXES,
    node::{Entity, Property},
    strip_class_prefixes,
    types::PropertyNameStyle,
};

/// The logical entity name generation hangs artifacts on: the explicit
/// marker override when present, otherwise the declared name with interface
/// `I`-prefixes or class prefixes stripped.
#[must_use]
pub fn logical_name(entity: &Entity) -> String {
    if let Some(name) = &entity.entity_name {
        return name.clone();
    }

    let simple = &entity.simple_name;
    if entity.is_interface {
        // IPerson style
        if let Some(rest) = simple.strip_prefix('I')
            && rest.chars().next().is_some_and(char::is_uppercase)
        {
            return rest.to_string();
        }
        return simple.clone();
    }

    let prefixes: Vec<String> = TABLE_PREFIXES.iter().map(ToString::to_string).collect();

    strip_class_prefixes(simple, &prefixes)
}

/// Name of the generated implementation type. When stripping changed
/// nothing, a suffix keeps the generated type from colliding with the
/// declaration.
#[must_use]
pub fn impl_type_name(entity: &Entity) -> String {
    let logical = logical_name(entity);

    if logical == entity.simple_name {
        let suffix = if entity.is_immutable { "Type" } else { "Entity" };
        format!("{logical}{suffix}")
    } else {
        logical
    }
}

/// Name of the generated metadata descriptor type.
#[must_use]
pub fn meta_type_name(entity: &Entity) -> String {
    format!("{}Meta", logical_name(entity))
}

/// Backing field name for a property in the generated implementation.
#[must_use]
pub fn field_name(property: &Property) -> String {
    property.name.to_case(Case::Snake)
}

/// Getter and setter names per the owner's naming convention: bean styles
/// use `is_`/`get_` and `set_` prefixes, fluent styles use the bare
/// property name for reads.
#[must_use]
pub fn accessor_names(entity: &Entity, property: &Property) -> (String, String) {
    let snake = field_name(property);
    let setter = format!("set_{snake}");

    let getter = match entity.name_style {
        PropertyNameStyle::Bean | PropertyNameStyle::FluentBean => {
            let prefix = if property.is_boolean { "is" } else { "get" };
            format!("{prefix}_{snake}")
        }
        PropertyNameStyle::Fluent | PropertyNameStyle::None => snake,
    };

    (getter, setter)
}

/// State-tracking field name for a property.
#[must_use]
pub fn state_field_name(property: &Property) -> String {
    format!("{}_state", field_name(property))
}
