use graphql_parser::Pos;
use graphql_parser::query::{
    Definition, Field, Number, OperationDefinition, Query, Selection, SelectionSet, Type, Value,
    VariableDefinition,
};
use crate::naming::{pluralize, query_field_name};
use crate::scanner::{Entity, SchemaIndex};
use crate::selection::expand_fields;

const ORIGIN: Pos = Pos { line: 0, column: 0 };

/// Literal a variable asks to default to. Kept only when the declared type matches.
pub enum DefaultValue {
    Int(i32),
    String(&'static str),
}

pub struct VariableOptions<'o> {
    pub name: &'o str,
    pub type_name: &'o str,
    pub non_null: bool,
    pub default_value: Option<DefaultValue>,
}

impl<'o> VariableOptions<'o> {
    pub fn new(name: &'o str, type_name: &'o str) -> VariableOptions<'o> {
        VariableOptions { name, type_name, non_null: false, default_value: None }
    }

    pub fn non_null(mut self) -> Self {
        self.non_null = true;
        self
    }

    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default_value = Some(value);
        self
    }
}

pub fn variable_definition(options: VariableOptions<'_>) -> VariableDefinition<'static, String> {
    let named = Type::NamedType(options.type_name.to_string());
    let var_type = if options.non_null {
        Type::NonNullType(Box::new(named))
    } else {
        named
    };
    // Defaults only survive on plain `Int` and `String` variables; anything else,
    // enum-typed variables included, drops the requested default.
    let default_value = match (options.type_name, options.default_value) {
        ("Int", Some(DefaultValue::Int(value))) => Some(Value::Int(Number::from(value))),
        ("String", Some(DefaultValue::String(value))) => Some(Value::String(value.to_string())),
        _ => None,
    };
    VariableDefinition {
        position: ORIGIN,
        name: options.name.to_string(),
        var_type,
        default_value,
    }
}

/// Binds an argument to the variable of the same name.
pub fn argument(name: &str) -> (String, Value<'static, String>) {
    (name.to_string(), Value::Variable(name.to_string()))
}

pub fn selection_set(items: Vec<Selection<'static, String>>) -> SelectionSet<'static, String> {
    SelectionSet { span: (ORIGIN, ORIGIN), items }
}

pub fn field(
    name: &str,
    arguments: Vec<(String, Value<'static, String>)>,
    selection_set: SelectionSet<'static, String>
) -> Field<'static, String> {
    Field {
        position: ORIGIN,
        alias: None,
        name: name.to_string(),
        arguments,
        directives: Vec::new(),
        selection_set,
    }
}

pub fn query_operation(
    name: String,
    variable_definitions: Vec<VariableDefinition<'static, String>>,
    root: Field<'static, String>
) -> Definition<'static, String> {
    Definition::Operation(OperationDefinition::Query(Query {
        position: ORIGIN,
        name: Some(name),
        variable_definitions,
        directives: Vec::new(),
        selection_set: selection_set(vec![Selection::Field(root)]),
    }))
}

/// Builds `GetOne<Entity>` and `GetMany<Entity>s` for one entity.
pub fn build_operations(entity: &Entity<'_>, index: &SchemaIndex<'_>) -> [Definition<'static, String>; 2] {
    [get_one_operation(entity, index), get_many_operation(entity, index)]
}

fn get_one_operation(entity: &Entity<'_>, index: &SchemaIndex<'_>) -> Definition<'static, String> {
    let entity_name = entity.name();
    let root = field(
        &query_field_name(entity_name),
        vec![argument("id")],
        expand_fields(&entity.object.fields, index, 0)
    );
    query_operation(
        format!("GetOne{}", entity_name),
        vec![variable_definition(VariableOptions::new("id", "ID").non_null())],
        root
    )
}

fn get_many_operation(entity: &Entity<'_>, index: &SchemaIndex<'_>) -> Definition<'static, String> {
    let entity_name = entity.name();
    let order_by_type = format!("{}_orderBy", entity_name);

    let variables = vec![
        variable_definition(VariableOptions::new("first", "Int").non_null().default_value(DefaultValue::Int(0))),
        variable_definition(VariableOptions::new("skip", "Int").default_value(DefaultValue::Int(0))),
        variable_definition(VariableOptions::new("orderBy", &order_by_type)),
        variable_definition(VariableOptions::new("orderDirection", "OrderDirection").default_value(DefaultValue::String("asc"))),
        variable_definition(VariableOptions::new("where", &entity.filter.name)),
    ];
    let arguments = vec![
        argument("first"),
        argument("skip"),
        argument("orderBy"),
        argument("orderDirection"),
        argument("where"),
    ];
    let root = field(
        &pluralize(&query_field_name(entity_name)),
        arguments,
        expand_fields(&entity.object.fields, index, 0)
    );
    // The operation name always takes a plain `s`, unlike the field name.
    query_operation(format!("GetMany{}s", entity_name), variables, root)
}
