use std::collections::HashMap;
use graphql_parser::schema::{Definition, Document, InputObjectType, ObjectType, TypeDefinition};
use crate::error::GenerateError;

/// Root operation types and indexer meta types never get queries of their own.
pub const EXCLUDED_TYPE_NAMES: &'static [&'static str] = &[
    "Query",
    "Mutation",
    "Subscription",
    "_Block_",
    "_Meta_",
];

const FILTER_SUFFIX: &'static str = "_filter";

/// Object and input object definitions of a schema, addressable by name.
///
/// When a name is defined twice the first definition in document order is kept.
pub struct SchemaIndex<'d> {
    objects: Vec<&'d ObjectType<'static, String>>,
    objects_by_name: HashMap<&'d str, &'d ObjectType<'static, String>>,
    inputs_by_name: HashMap<&'d str, &'d InputObjectType<'static, String>>,
}

impl<'d> SchemaIndex<'d> {
    pub fn new(document: &'d Document<'static, String>) -> SchemaIndex<'d> {
        let mut objects = Vec::new();
        let mut objects_by_name = HashMap::new();
        let mut inputs_by_name = HashMap::new();

        for definition in &document.definitions {
            match definition {
                Definition::TypeDefinition(TypeDefinition::Object(object)) => {
                    objects.push(object);
                    objects_by_name.entry(object.name.as_str()).or_insert(object);
                }
                Definition::TypeDefinition(TypeDefinition::InputObject(input)) => {
                    inputs_by_name.entry(input.name.as_str()).or_insert(input);
                }
                _ => (),
            }
        }

        SchemaIndex { objects, objects_by_name, inputs_by_name }
    }

    pub fn object(&self, name: &str) -> Option<&'d ObjectType<'static, String>> {
        self.objects_by_name.get(name).copied()
    }

    pub fn input_object(&self, name: &str) -> Option<&'d InputObjectType<'static, String>> {
        self.inputs_by_name.get(name).copied()
    }
}

/// An entity object type paired with its `<Entity>_filter` input type.
pub struct Entity<'d> {
    pub object: &'d ObjectType<'static, String>,
    pub filter: &'d InputObjectType<'static, String>,
}

impl<'d> Entity<'d> {
    pub fn name(&self) -> &'d str {
        &self.object.name
    }
}

pub fn filter_type_name(entity_name: &str) -> String {
    format!("{}{}", entity_name, FILTER_SUFFIX)
}

pub fn is_entity_name(name: &str) -> bool {
    !EXCLUDED_TYPE_NAMES.contains(&name)
}

/// Lists every entity of the schema in definition order.
///
/// Fails on the first entity without a filter input type.
pub fn scan_entities<'d>(index: &SchemaIndex<'d>) -> Result<Vec<Entity<'d>>, GenerateError> {
    index.objects
        .iter()
        .copied()
        .filter(|object| is_entity_name(&object.name))
        .map(|object| {
            match index.input_object(&filter_type_name(&object.name)) {
                Some(filter) => Ok(Entity { object, filter }),
                None => Err(GenerateError::MissingFilterType { entity: object.name.clone() }),
            }
        })
        .collect()
}
