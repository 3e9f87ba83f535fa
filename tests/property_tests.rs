//! Property-based tests over generated schemas

use proptest::prelude::*;
use xsd_compiler::builtins::BuiltinType;
use xsd_compiler::{compile_str, WarningKind};

fn group_cycle_schema(length: usize) -> String {
    let mut xsd = String::from(r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">"#);
    for i in 0..length {
        xsd.push_str(&format!(
            r#"<xs:group name="G{}"><xs:sequence><xs:element name="e{}" type="xs:string"/><xs:group ref="G{}"/></xs:sequence></xs:group>"#,
            i,
            i,
            (i + 1) % length
        ));
    }
    xsd.push_str(
        r#"<xs:complexType name="Holder"><xs:sequence><xs:group ref="G0"/><xs:element name="tail" type="xs:string"/></xs:sequence></xs:complexType>"#,
    );
    xsd.push_str("</xs:schema>");
    xsd
}

proptest! {
    #[test]
    fn prop_builtin_types_pass_through(
        builtin in proptest::sample::select(BuiltinType::ALL.to_vec()),
        name in "[a-z][a-zA-Z0-9]{0,12}",
    ) {
        let xsd = format!(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"><xsd:element name="{}" type="xsd:{}"/></xsd:schema>"#,
            name,
            builtin.local_name()
        );
        let model = compile_str(&xsd).unwrap();
        let element = model.lookup_element(&name).unwrap();

        let expected = format!("xsd:{}", builtin.local_name());
        prop_assert_eq!(element.type_name(), Some(expected.as_str()));
        prop_assert_eq!(element.builtin(), Some(builtin));
        prop_assert!(!element.is_complex());
    }

    #[test]
    fn prop_group_cycles_terminate_with_warning(length in 1usize..8) {
        let model = compile_str(&group_cycle_schema(length)).unwrap();

        prop_assert!(model
            .warnings()
            .iter()
            .any(|w| w.kind == WarningKind::CircularGroupReference));

        let holder = model.lookup_element("Holder").unwrap();
        let names: Vec<String> = holder.children().map(|c| c.name().to_string()).collect();

        let mut expected: Vec<String> = (0..length).map(|i| format!("e{}", i)).collect();
        expected.push("tail".to_string());
        prop_assert_eq!(names, expected);
    }
}
