use graphql_parser::Pos;
use graphql_parser::schema::{
    self, Definition, Document, EnumType, EnumValue as SchemaEnumValue, InputObjectType, ObjectType,
    ScalarType, Type, TypeDefinition,
};
use serde::Deserialize;
use serde_json::Deserializer;
use serde_path_to_error::deserialize;
use crate::error::SchemaLoadError;
use crate::generator::SchemaDocument;

pub const INTROSPECTION_QUERY: &'static str = include_str!("../resources/introspect.gql");

pub const BUILT_IN_SCALARS: &'static [&'static str] = &[ "Int", "String", "Float", "Boolean", "ID" ];

const ORIGIN: Pos = Pos { line: 0, column: 0 };

/// Rebuilds a schema document from the JSON body of an introspection response.
///
/// Introspection meta types (`__Type` and friends), built-in scalars, interfaces and
/// unions are not carried over.
pub fn from_response_body(response_body: &str) -> Result<SchemaDocument, SchemaLoadError> {
    let deserializer = &mut Deserializer::from_str(response_body);
    let response: IntrospectionQueryResponse = deserialize(deserializer)?;
    let data = match response.data {
        Some(data) => data,
        None => {
            let messages: Vec<String> = response.errors.into_iter().map(|it| it.message).collect();
            return Err(SchemaLoadError::Response(messages.join("; ")));
        }
    };

    let definitions = data.schema.types
        .into_iter()
        .filter(|full_type| !full_type.name().is_some_and(|name| name.starts_with("__")))
        .filter_map(to_type_definition)
        .map(Definition::TypeDefinition)
        .collect();
    Ok(Document { definitions })
}

fn to_type_definition(full_type: FullType) -> Option<TypeDefinition<'static, String>> {
    match full_type {
        FullType::Object { name, description, fields } => {
            let mut object = ObjectType::new(name);
            object.description = description;
            object.fields = fields.into_iter().map(to_field).collect();
            Some(TypeDefinition::Object(object))
        }
        FullType::InputObject { name, description, input_fields } => {
            let mut input = InputObjectType::new(name);
            input.description = description;
            input.fields = input_fields.into_iter().map(to_input_value).collect();
            Some(TypeDefinition::InputObject(input))
        }
        FullType::Enum { name, description, enum_values } => {
            let mut enum_type = EnumType::new(name);
            enum_type.description = description;
            enum_type.values = enum_values
                .into_iter()
                .map(|value| {
                    let mut enum_value = SchemaEnumValue::new(value.name);
                    enum_value.description = value.description;
                    enum_value
                })
                .collect();
            Some(TypeDefinition::Enum(enum_type))
        }
        FullType::Scalar { name, description } => {
            if BUILT_IN_SCALARS.contains(&name.as_str()) {
                None
            } else {
                let mut scalar = ScalarType::new(name);
                scalar.description = description;
                Some(TypeDefinition::Scalar(scalar))
            }
        }
        FullType::Interface => None,
        FullType::Union => None,
    }
}

fn to_field(field: Field) -> schema::Field<'static, String> {
    schema::Field {
        position: ORIGIN,
        description: field.description,
        name: field.name,
        arguments: field.args.into_iter().map(to_input_value).collect(),
        field_type: to_type(field.field_type),
        directives: Vec::new(),
    }
}

fn to_input_value(value: InputValue) -> schema::InputValue<'static, String> {
    schema::InputValue {
        position: ORIGIN,
        description: value.description,
        name: value.name,
        value_type: to_type(value.input_type),
        default_value: None,
        directives: Vec::new(),
    }
}

fn to_type(type_ref: TypeRef) -> Type<'static, String> {
    match type_ref {
        TypeRef::NonNull { of_type } => Type::NonNullType(Box::new(to_type(*of_type))),
        TypeRef::List { of_type } => Type::ListType(Box::new(to_type(*of_type))),
        TypeRef::Scalar { name }
        | TypeRef::Object { name }
        | TypeRef::InputObject { name }
        | TypeRef::Enum { name }
        | TypeRef::Interface { name }
        | TypeRef::Union { name } => Type::NamedType(name),
    }
}

#[derive(Deserialize)]
struct IntrospectionQueryResponse {
    data: Option<SchemaData>,
    #[serde(default)]
    errors: Vec<ResponseError>,
}

#[derive(Deserialize)]
struct ResponseError {
    message: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaData {
    #[serde(rename = "__schema")]
    schema: Schema,
}

#[derive(Deserialize)]
struct Schema {
    types: Vec<FullType>
}

#[derive(Deserialize)]
#[serde(tag = "kind")]
enum FullType {
    #[serde(rename = "OBJECT")]
    Object {
        name: String,
        description: Option<String>,
        fields: Vec<Field>
    },
    #[serde(rename = "INTERFACE")]
    Interface,
    #[serde(rename = "ENUM")]
    Enum {
        name: String,
        description: Option<String>,
        #[serde(rename = "enumValues")]
        enum_values: Vec<EnumValue>
    },
    #[serde(rename = "INPUT_OBJECT")]
    InputObject {
        name: String,
        description: Option<String>,
        #[serde(rename = "inputFields")]
        input_fields: Vec<InputValue>
    },
    #[serde(rename = "SCALAR")]
    Scalar {
        name: String,
        description: Option<String>,
    },
    #[serde(rename = "UNION")]
    Union,
}

impl FullType {
    fn name(&self) -> Option<&str> {
        match self {
            FullType::Object { name, .. } => Some(name.as_str()),
            FullType::Enum { name, .. } => Some(name.as_str()),
            FullType::InputObject { name, .. } => Some(name.as_str()),
            FullType::Scalar { name, .. } => Some(name.as_str()),
            FullType::Interface => None,
            FullType::Union => None,
        }
    }
}

#[derive(Deserialize)]
struct Field {
    name: String,
    description: Option<String>,
    #[serde(default)]
    args: Vec<InputValue>,
    #[serde(rename = "type")]
    field_type: TypeRef,
}

#[derive(Deserialize)]
struct InputValue {
    name: String,
    description: Option<String>,
    #[serde(rename = "type")]
    input_type: TypeRef
}

#[derive(Deserialize)]
#[serde(tag = "kind")]
enum TypeRef {
    #[serde(rename = "NON_NULL")]
    NonNull {
        #[serde(rename = "ofType")]
        of_type: Box<TypeRef>
    },
    #[serde(rename = "SCALAR")]
    Scalar {
        name: String
    },
    #[serde(rename = "INPUT_OBJECT")]
    InputObject {
        name: String
    },
    #[serde(rename = "LIST")]
    List {
        #[serde(rename = "ofType")]
        of_type: Box<TypeRef>,
    },
    #[serde(rename = "OBJECT")]
    Object {
        name: String
    },
    #[serde(rename = "ENUM")]
    Enum {
        name: String
    },
    #[serde(rename = "INTERFACE")]
    Interface {
        name: String
    },
    #[serde(rename = "UNION")]
    Union {
        name: String
    },
}

#[derive(Deserialize)]
struct EnumValue {
    name: String,
    description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::named_type;

    const RESPONSE: &str = r#"{
        "data": {
            "__schema": {
                "types": [
                    { "kind": "OBJECT", "name": "Query", "description": null, "fields": [
                        { "name": "post", "description": null,
                          "args": [ { "name": "id", "description": null,
                                      "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "SCALAR", "name": "ID", "ofType": null } } } ],
                          "type": { "kind": "OBJECT", "name": "Post", "ofType": null } }
                    ], "inputFields": null, "enumValues": null },
                    { "kind": "OBJECT", "name": "Post", "description": "A post", "fields": [
                        { "name": "id", "description": null, "args": [],
                          "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "SCALAR", "name": "ID", "ofType": null } } },
                        { "name": "tags", "description": null, "args": [],
                          "type": { "kind": "LIST", "name": null, "ofType": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "OBJECT", "name": "Tag", "ofType": null } } } }
                    ], "inputFields": null, "enumValues": null },
                    { "kind": "INPUT_OBJECT", "name": "Post_filter", "description": null, "fields": null, "inputFields": [
                        { "name": "id", "description": null, "type": { "kind": "SCALAR", "name": "ID", "ofType": null } }
                    ], "enumValues": null },
                    { "kind": "ENUM", "name": "OrderDirection", "description": null, "fields": null, "inputFields": null, "enumValues": [
                        { "name": "asc", "description": null },
                        { "name": "desc", "description": null }
                    ] },
                    { "kind": "SCALAR", "name": "BigInt", "description": null, "fields": null, "inputFields": null, "enumValues": null },
                    { "kind": "SCALAR", "name": "String", "description": null, "fields": null, "inputFields": null, "enumValues": null },
                    { "kind": "UNION", "name": "SearchResult", "description": null, "fields": null, "inputFields": null, "enumValues": null },
                    { "kind": "OBJECT", "name": "__Type", "description": null, "fields": [], "inputFields": null, "enumValues": null }
                ]
            }
        }
    }"#;

    fn type_names(document: &SchemaDocument) -> Vec<&str> {
        document.definitions
            .iter()
            .map(|definition| match definition {
                Definition::TypeDefinition(TypeDefinition::Object(it)) => it.name.as_str(),
                Definition::TypeDefinition(TypeDefinition::InputObject(it)) => it.name.as_str(),
                Definition::TypeDefinition(TypeDefinition::Enum(it)) => it.name.as_str(),
                Definition::TypeDefinition(TypeDefinition::Scalar(it)) => it.name.as_str(),
                _ => panic!("unexpected definition"),
            })
            .collect()
    }

    #[test]
    fn rebuilds_schema_definitions() {
        let document = from_response_body(RESPONSE).unwrap();
        assert_eq!(type_names(&document), vec!["Query", "Post", "Post_filter", "OrderDirection", "BigInt"]);

        let Definition::TypeDefinition(TypeDefinition::Object(post)) = &document.definitions[1] else {
            panic!("expected Post object");
        };
        assert_eq!(post.description.as_deref(), Some("A post"));
        assert_eq!(post.fields[0].field_type, Type::NonNullType(Box::new(Type::NamedType("ID".to_string()))));
        assert_eq!(named_type(&post.fields[1].field_type), "Tag");
        assert_eq!(
            post.fields[1].field_type,
            Type::ListType(Box::new(Type::NonNullType(Box::new(Type::NamedType("Tag".to_string())))))
        );
    }

    #[test]
    fn keeps_field_arguments() {
        let document = from_response_body(RESPONSE).unwrap();
        let Definition::TypeDefinition(TypeDefinition::Object(query)) = &document.definitions[0] else {
            panic!("expected Query object");
        };
        assert_eq!(query.fields[0].arguments[0].name, "id");
    }

    #[test]
    fn error_response_fails() {
        let body = r#"{ "data": null, "errors": [ { "message": "not allowed" }, { "message": "try later" } ] }"#;
        let error = from_response_body(body).unwrap_err();
        assert_eq!(error.to_string(), "endpoint returned errors: not allowed; try later");
    }

    #[test]
    fn decode_errors_carry_the_json_path() {
        let body = r#"{ "data": { "__schema": { "types": [ { "kind": "OBJECT", "name": "Post", "fields": [ { "name": 3 } ] } ] } } }"#;
        let error = from_response_body(body).unwrap_err();
        assert!(matches!(error, SchemaLoadError::Introspection { .. }));
    }

    #[test]
    fn decodes_nested_list_wrappers() {
        let body = r#"{ "data": { "__schema": { "types": [
            { "kind": "OBJECT", "name": "Grid", "fields": [
                { "name": "cells", "args": [], "type":
                    { "kind": "NON_NULL", "name": null, "ofType":
                    { "kind": "LIST", "name": null, "ofType":
                    { "kind": "NON_NULL", "name": null, "ofType":
                    { "kind": "LIST", "name": null, "ofType":
                    { "kind": "NON_NULL", "name": null, "ofType":
                    { "kind": "OBJECT", "name": "Cell", "ofType": null } } } } } } }
            ] }
        ] } } }"#;
        let document = from_response_body(body).unwrap();
        let Definition::TypeDefinition(TypeDefinition::Object(grid)) = &document.definitions[0] else {
            panic!("expected Grid object");
        };
        let non_null = |inner: Type<'static, String>| Type::NonNullType(Box::new(inner));
        let list = |inner: Type<'static, String>| Type::ListType(Box::new(inner));
        assert_eq!(
            grid.fields[0].field_type,
            non_null(list(non_null(list(non_null(Type::NamedType("Cell".to_string()))))))
        );
    }

    #[test]
    fn type_ref_fragment_reaches_nested_list_wrappers() {
        let fragment = &INTROSPECTION_QUERY[INTROSPECTION_QUERY.find("fragment TypeRef").unwrap()..];
        // `[[X!]!]!` spells out six levels before reaching the named type.
        assert!(fragment.matches("kind").count() >= 6);
    }
}
