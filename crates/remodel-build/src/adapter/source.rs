use crate::adapter::{
    Annotation, ClassDecl, Member, MemberKind, NamedType, TypeRef, resolve_annotation,
};
use quote::ToTokens;
use remodel_schema::{diagnostic::Diagnostics, err, types::ContainerShape};
use syn::{
    Fields, File, GenericArgument, Item, ItemStruct, ItemTrait, PathArguments, ReturnType,
    TraitItem, Type, TypeParamBound, Visibility,
};

///
/// ReadOutcome
///

#[derive(Debug, Default)]
pub struct ReadOutcome {
    pub declarations: Vec<ClassDecl>,
    pub diagnostics: Diagnostics,
}

///
/// SourceReader
///
/// Lowers the host declaration model (a parsed Rust source file) into owned
/// adapter records. Structs contribute field members; traits are interface
/// declarations contributing getter members. Malformed declarations become
/// per-declaration diagnostics, never a process abort.
///

#[derive(Debug)]
pub struct SourceReader {
    package: String,
}

impl SourceReader {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }

    pub fn read_source(&self, source: &str) -> Result<ReadOutcome, syn::Error> {
        let file = syn::parse_file(source)?;

        Ok(self.read_file(&file))
    }

    #[must_use]
    pub fn read_file(&self, file: &File) -> ReadOutcome {
        let mut outcome = ReadOutcome::default();

        for item in &file.items {
            match item {
                Item::Struct(item) => self.lower_struct(item, &mut outcome),
                Item::Trait(item) => self.lower_trait(item, &mut outcome),
                Item::Enum(item) => self.reject_marked(&item.attrs, &item.ident, "enum", &mut outcome),
                Item::Union(item) => {
                    self.reject_marked(&item.attrs, &item.ident, "union", &mut outcome);
                }
                _ => {}
            }
        }

        outcome
    }

    fn lower_struct(&self, item: &ItemStruct, outcome: &mut ReadOutcome) {
        let subject = self.qualified(&item.ident.to_string());
        let annotations = self.lower_annotations(&item.attrs, &subject, &mut outcome.diagnostics);

        let members = match &item.fields {
            Fields::Named(named) => named
                .named
                .iter()
                .map(|field| {
                    let name = field
                        .ident
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    let member_subject = format!("{subject}.{name}");

                    Member {
                        name,
                        kind: MemberKind::Field,
                        is_private: !matches!(field.vis, Visibility::Public(_)),
                        is_static: false,
                        ty: self.lower_type(&field.ty),
                        annotations: self.lower_annotations(
                            &field.attrs,
                            &member_subject,
                            &mut outcome.diagnostics,
                        ),
                    }
                })
                .collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                if has_marker(&annotations) {
                    err!(
                        outcome.diagnostics,
                        &subject,
                        "mapped type '{}' requires named fields",
                        item.ident
                    );
                }
                return;
            }
        };

        let supertypes = annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Extends(path) | Annotation::Implements(path) => {
                    Some(TypeRef::Named(NamedType {
                        qualified: self.qualify_path(path),
                        arguments: Vec::new(),
                        container: None,
                    }))
                }
                _ => None,
            })
            .collect();

        outcome.declarations.push(ClassDecl {
            package: self.package.clone(),
            simple_name: item.ident.to_string(),
            is_interface: false,
            is_abstract: false,
            is_sealed: item
                .attrs
                .iter()
                .any(|a| a.path().is_ident("non_exhaustive")),
            annotations,
            members,
            supertypes,
        });
    }

    fn lower_trait(&self, item: &ItemTrait, outcome: &mut ReadOutcome) {
        let subject = self.qualified(&item.ident.to_string());
        let annotations = self.lower_annotations(&item.attrs, &subject, &mut outcome.diagnostics);

        let supertypes = item
            .supertraits
            .iter()
            .filter_map(|bound| match bound {
                TypeParamBound::Trait(bound) => Some(TypeRef::Named(NamedType {
                    qualified: self.qualify_path(&path_to_string(&bound.path)),
                    arguments: Vec::new(),
                    container: None,
                })),
                _ => None,
            })
            .collect();

        let mut members = Vec::new();
        for trait_item in &item.items {
            let TraitItem::Fn(method) = trait_item else {
                continue;
            };
            // Provided methods carry behavior, not mapped state.
            if method.default.is_some() {
                continue;
            }

            let receiver = method.sig.receiver().is_some();
            let arity = method.sig.inputs.len() - usize::from(receiver);
            if arity > 0 {
                continue;
            }

            let name = method.sig.ident.to_string();
            let member_subject = format!("{subject}.{name}");
            let ty = match &method.sig.output {
                ReturnType::Default => TypeRef::Named(NamedType {
                    qualified: "()".to_string(),
                    arguments: Vec::new(),
                    container: None,
                }),
                ReturnType::Type(_, ty) => self.lower_type(ty),
            };

            members.push(Member {
                name,
                kind: MemberKind::Getter,
                is_private: false,
                is_static: !receiver,
                ty,
                annotations: self.lower_annotations(
                    &method.attrs,
                    &member_subject,
                    &mut outcome.diagnostics,
                ),
            });
        }

        outcome.declarations.push(ClassDecl {
            package: self.package.clone(),
            simple_name: item.ident.to_string(),
            is_interface: true,
            is_abstract: true,
            is_sealed: false,
            annotations,
            members,
            supertypes,
        });
    }

    fn reject_marked(
        &self,
        attrs: &[syn::Attribute],
        ident: &syn::Ident,
        kind: &str,
        outcome: &mut ReadOutcome,
    ) {
        let subject = self.qualified(&ident.to_string());
        let annotations = self.lower_annotations(attrs, &subject, &mut outcome.diagnostics);

        if has_marker(&annotations) {
            err!(
                outcome.diagnostics,
                &subject,
                "entity marker cannot be applied to {kind} '{ident}'"
            );
        }
    }

    fn lower_annotations(
        &self,
        attrs: &[syn::Attribute],
        subject: &str,
        diags: &mut Diagnostics,
    ) -> Vec<Annotation> {
        let mut annotations = Vec::new();

        for attr in attrs {
            match resolve_annotation(attr) {
                Ok(Some(annotation)) => annotations.push(annotation),
                Ok(None) => {}
                Err(e) => {
                    err!(diags, subject, "{e}");
                }
            }
        }

        annotations
    }

    fn lower_type(&self, ty: &Type) -> TypeRef {
        match ty {
            Type::Path(tp) if tp.qself.is_none() => {
                let Some(last) = tp.path.segments.last() else {
                    return TypeRef::Unresolved(ty.to_token_stream().to_string());
                };

                let arguments = match &last.arguments {
                    PathArguments::None => Vec::new(),
                    PathArguments::AngleBracketed(args) => args
                        .args
                        .iter()
                        .filter_map(|arg| match arg {
                            GenericArgument::Type(inner) => Some(self.lower_type(inner)),
                            _ => None,
                        })
                        .collect(),
                    PathArguments::Parenthesized(_) => {
                        return TypeRef::Unresolved(ty.to_token_stream().to_string());
                    }
                };

                TypeRef::Named(NamedType {
                    qualified: self.qualify_path(&path_to_string(&tp.path)),
                    arguments,
                    container: container_shape(&last.ident.to_string()),
                })
            }
            Type::Reference(reference) => self.lower_type(&reference.elem),
            Type::Paren(paren) => self.lower_type(&paren.elem),
            Type::Tuple(tuple) if tuple.elems.is_empty() => TypeRef::Named(NamedType {
                qualified: "()".to_string(),
                arguments: Vec::new(),
                container: None,
            }),
            other => TypeRef::Unresolved(other.to_token_stream().to_string()),
        }
    }

    fn qualified(&self, simple: &str) -> String {
        if self.package.is_empty() {
            simple.to_string()
        } else {
            format!("{}::{simple}", self.package)
        }
    }

    // Single-segment user types resolve against the reader's package;
    // builtins and already-qualified paths pass through unchanged.
    fn qualify_path(&self, path: &str) -> String {
        if path.contains("::") || is_builtin(path) || self.package.is_empty() {
            return path.to_string();
        }

        let starts_upper = path.chars().next().is_some_and(char::is_uppercase);
        if starts_upper {
            format!("{}::{path}", self.package)
        } else {
            path.to_string()
        }
    }
}

// Closed container-family set; resolved structurally from the declaration
// model, never by substring matching on user type names.
fn container_shape(ident: &str) -> Option<ContainerShape> {
    match ident {
        "Vec" | "VecDeque" | "LinkedList" => Some(ContainerShape::List),
        "HashSet" | "BTreeSet" => Some(ContainerShape::Set),
        "HashMap" | "BTreeMap" => Some(ContainerShape::Map),
        _ => None,
    }
}

fn is_builtin(name: &str) -> bool {
    matches!(
        name,
        "bool"
            | "char"
            | "str"
            | "String"
            | "i8"
            | "i16"
            | "i32"
            | "i64"
            | "i128"
            | "isize"
            | "u8"
            | "u16"
            | "u32"
            | "u64"
            | "u128"
            | "usize"
            | "f32"
            | "f64"
            | "()"
            | "Option"
            | "Vec"
            | "VecDeque"
            | "LinkedList"
            | "HashSet"
            | "BTreeSet"
            | "HashMap"
            | "BTreeMap"
    )
}

fn has_marker(annotations: &[Annotation]) -> bool {
    annotations.iter().any(|a| {
        matches!(
            a,
            Annotation::Entity(_) | Annotation::Superclass | Annotation::Embeddable
        )
    })
}

fn path_to_string(path: &syn::Path) -> String {
    path.segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}
