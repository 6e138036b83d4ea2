use tilekit::{
    coerce, coerce_into, type_set_of, CoercionError, DeclaredType, Error, FieldDecl, ParamRecord,
    ParamType, RawParam, Record, RecordSchema, SchemaRegistry, ShapeError, Ty, TypeSet, Value,
};

fn raws(xs: &[&str]) -> Vec<RawParam> {
    xs.iter().map(|s| RawParam::text(*s)).collect()
}

fn set(name: &str, tys: &[Ty]) -> FieldDecl {
    FieldDecl::new(name, ParamType::Set(TypeSet(tys.to_vec())))
}

#[test]
fn null_marker_makes_any_input_null() {
    let inputs = ["", "5", "abc", "true", "2.5"];
    for tys in [vec![Ty::Null], vec![Ty::Int, Ty::Null], vec![Ty::Str, Ty::Float, Ty::Null]] {
        for input in inputs {
            let out = coerce(&raws(&[input]), &[set("x", &tys)]).unwrap();
            assert_eq!(out, vec![Value::Null], "{tys:?} on {input:?}");
        }
        let out = coerce(&[RawParam::null()], &[set("x", &tys)]).unwrap();
        assert_eq!(out, vec![Value::Null]);
    }
}

#[test]
fn integer_strings_parse_to_their_value() {
    for (src, n) in [("0", 0), ("5", 5), ("-12", -12), ("123456789", 123456789), (" 8 ", 8)] {
        let out = coerce(&raws(&[src]), &[set("n", &[Ty::Int])]).unwrap();
        assert_eq!(out, vec![Value::Int(n)]);
    }
}

#[test]
fn failed_type_is_skipped_for_the_next() {
    let out = coerce(&raws(&["abc"]), &[set("x", &[Ty::Int, Ty::Str])]).unwrap();
    assert_eq!(out, vec![Value::str("abc")]);
}

#[test]
fn no_matching_type_is_an_error() {
    let err = coerce(&raws(&["abc"]), &[set("x", &[Ty::Int])]).unwrap_err();
    assert_eq!(err, CoercionError {
        field: "x".into(),
        raw: "abc".into(),
        types: TypeSet::single(Ty::Int),
    });
    assert!(err.to_string().contains("`x`"));
}

#[test]
fn missing_parameters_are_null() {
    let decls = [set("a", &[Ty::Int]), set("b", &[Ty::Str])];
    assert_eq!(coerce(&raws(&["5"]), &decls).unwrap(), vec![Value::Int(5), Value::Null]);
}

#[test]
fn declaration_order_decides_ambiguous_inputs() {
    assert_eq!(coerce(&raws(&["5"]), &[set("x", &[Ty::Float, Ty::Str])]).unwrap(), vec![Value::float(5.0)]);
    assert_eq!(coerce(&raws(&["5"]), &[set("x", &[Ty::Str, Ty::Float])]).unwrap(), vec![Value::str("5")]);
    assert_eq!(coerce(&raws(&["5"]), &[set("x", &[Ty::Int, Ty::Float])]).unwrap(), vec![Value::Int(5)]);
    assert_eq!(coerce(&raws(&["1"]), &[set("x", &[Ty::Bool, Ty::Int])]).unwrap(), vec![Value::Bool(true)]);
}

#[test]
fn one_bad_field_fails_the_whole_batch() {
    let decls = [set("a", &[Ty::Int]), set("b", &[Ty::Int]), set("c", &[Ty::Int])];
    let err = coerce(&raws(&["1", "two", "3"]), &decls).unwrap_err();
    assert_eq!(err.field, "b");
}

#[test]
fn record_fields_read_back_in_declared_order() {
    let schema = RecordSchema::new("spawn_npc")
        .field("npc_slug", Ty::Str)
        .field("tile_x", Ty::Int)
        .field("tile_y", Ty::Int)
        .field("speed", DeclaredType::Union(vec![Ty::Float, Ty::Str]))
        .field("visible", Ty::Bool);
    let params = raws(&["maple_girl", "4", "9", "fast", "no"]);

    let descriptors = schema.descriptors();
    let coerced = coerce(&params, &descriptors).unwrap();
    let record = tilekit::coerce_to_record(&params, &schema).unwrap();

    let names = record.iter().map(|(k, _)| k.to_string()).collect::<Vec<_>>();
    let declared = schema.fields().iter().map(|f| f.name.clone()).collect::<Vec<_>>();
    assert_eq!(names, declared);
    assert_eq!(record.values().cloned().collect::<Vec<_>>(), coerced);
    assert_eq!(descriptors[3].ty, ParamType::Set(type_set_of(&schema.fields()[3].ty)));
}

#[test]
fn unknown_record_is_a_shape_error() {
    let registry = SchemaRegistry::new();
    assert!(matches!(
        registry.coerce("teleport", &raws(&["town.tmx"])),
        Err(Error::Shape(ShapeError::UnknownRecord(_)))
    ));
}

#[derive(Debug, PartialEq)]
struct Teleport {
    map_name: String,
    x: i64,
    y: i64,
    fade: Option<f64>,
}

impl ParamRecord for Teleport {
    fn schema() -> RecordSchema {
        RecordSchema::new("teleport")
            .field("map_name", Ty::Str)
            .field("x", Ty::Int)
            .field("y", Ty::Int)
            .field("fade", DeclaredType::Union(vec![Ty::Float]))
    }

    fn from_record(mut record: Record) -> Result<Self, ShapeError> {
        Ok(Teleport {
            map_name: record.take("map_name")?,
            x: record.take("x")?,
            y: record.take("y")?,
            fade: record.take("fade")?,
        })
    }
}

#[test]
fn typed_records() {
    let teleport: Teleport = coerce_into(&raws(&["town.tmx", "5", "7"])).unwrap();
    assert_eq!(teleport, Teleport { map_name: "town.tmx".into(), x: 5, y: 7, fade: None });

    let teleport: Teleport = coerce_into(&raws(&["town.tmx", "5", "7", "0.25"])).unwrap();
    assert_eq!(teleport.fade, Some(0.25));
}

#[test]
fn typed_record_reports_missing_required_value() {
    match coerce_into::<Teleport>(&raws(&["town.tmx", "5"])) {
        Err(Error::Shape(ShapeError::FieldType { field, found, .. })) => {
            assert_eq!(field, "y");
            assert_eq!(found, "null");
        }
        other => panic!("expected shape error, got {other:?}"),
    }
}

#[test]
fn schema_files_drive_the_registry() {
    let src = include_str!("../demos/actions.json");
    let registry = SchemaRegistry::from_json(src).unwrap();
    assert!(registry.contains("teleport"));
    let record = registry.coerce("set_variable", &raws(&["steps", "12"])).unwrap();
    assert_eq!(record.get("value"), Some(&Value::Int(12)));
}
