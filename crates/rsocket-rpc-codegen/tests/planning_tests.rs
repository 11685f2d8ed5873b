//! Integration tests for the planning core
//!
//! Classification, route table construction and emission planning, driven
//! through the public API the way a harness uses it.

use pretty_assertions::assert_eq;
use rsocket_rpc_codegen::codegen::plan::DispatchStrategy;
use rsocket_rpc_codegen::prelude::*;

fn echo_service() -> ServiceDefinition {
    ServiceDefinition::new("EchoService")
        .with_namespace("io.example.echo")
        .with_method(MethodDefinition::new("Echo", "Msg", "Msg"))
        .with_method(MethodDefinition::new("Notify", "Msg", "Empty").one_way())
        .with_method(MethodDefinition::new("Watch", "Msg", "Msg").server_streaming())
        .with_method(
            MethodDefinition::new("Chat", "Msg", "Msg")
                .client_streaming()
                .server_streaming(),
        )
        .with_method(MethodDefinition::new("Upload", "Msg", "Msg").client_streaming())
        .with_method(MethodDefinition::new("get_user", "Req", "User"))
}

// ========== Identifiers ==========

#[test]
fn test_identifier_rules() {
    let ids = MethodIdentifiers::derive("io.example.Svc", "SayHelloAgain").unwrap();
    assert_eq!(ids.lower_camel, "sayHelloAgain");
    assert_eq!(ids.method_constant, "METHOD_SAY_HELLO_AGAIN");
    assert_eq!(ids.route_constant, "ROUTE_SAY_HELLO_AGAIN");
    assert_eq!(ids.route_key, "io.example.Svc.METHOD_SAY_HELLO_AGAIN");
    assert_eq!(ids.wire_route, "io.example.Svc.SayHelloAgain");

    for bad in ["", "___", "get user", "caf\u{e9}"] {
        let err = MethodIdentifiers::derive("Svc", bad).unwrap_err();
        assert_eq!(err.rule(), "InvalidIdentifier", "{bad:?}");
    }
}

#[test]
fn test_service_identifier_without_namespace() {
    let table = build_route_table(&ServiceDefinition::new("Bare")).unwrap();
    assert_eq!(table.service_id, "Bare");
    assert!(table.is_empty());
}

// ========== Classification ==========

#[test]
fn test_classification_table() {
    let cases = [
        ((false, false, true), InteractionSemantic::OneWay),
        ((false, false, false), InteractionSemantic::UnarySingleResponse),
        ((false, true, false), InteractionSemantic::ServerStream),
        ((false, true, true), InteractionSemantic::ServerStream),
        ((true, false, false), InteractionSemantic::ClientOrBidiStream),
        ((true, false, true), InteractionSemantic::ClientOrBidiStream),
        ((true, true, false), InteractionSemantic::ClientOrBidiStream),
        ((true, true, true), InteractionSemantic::ClientOrBidiStream),
    ];

    for ((client, server, one_way), expected) in cases {
        let mut method = MethodDefinition::new("M", "A", "B");
        method.client_streaming = client;
        method.server_streaming = server;
        method.one_way = one_way;
        assert_eq!(
            classify(&method),
            expected,
            "client={client} server={server} one_way={one_way}"
        );
    }
}

#[test]
fn test_one_way_loses_to_streaming() {
    let method = MethodDefinition::new("Chat", "A", "B")
        .client_streaming()
        .server_streaming()
        .one_way();
    assert_eq!(classify(&method), InteractionSemantic::ClientOrBidiStream);
}

// ========== Route table ==========

#[test]
fn test_route_table_buckets_keep_declaration_order() {
    let table = build_route_table(&echo_service()).unwrap();

    let bucket = |semantic| {
        table
            .bucket(semantic)
            .iter()
            .map(|binding| binding.method.name.as_str())
            .collect::<Vec<_>>()
    };

    assert_eq!(bucket(InteractionSemantic::OneWay), vec!["Notify"]);
    assert_eq!(
        bucket(InteractionSemantic::UnarySingleResponse),
        vec!["Echo", "get_user"]
    );
    assert_eq!(bucket(InteractionSemantic::ServerStream), vec!["Watch"]);
    assert_eq!(
        bucket(InteractionSemantic::ClientOrBidiStream),
        vec!["Chat", "Upload"]
    );
    assert_eq!(table.len(), 6);
}

#[test]
fn test_route_keys_are_qualified() {
    let table = build_route_table(&echo_service()).unwrap();

    assert_eq!(table.service_id, "io.example.echo.EchoService");
    let binding = table
        .get("io.example.echo.EchoService.METHOD_GET_USER")
        .unwrap();
    assert_eq!(binding.identifiers.lower_camel, "getUser");
    assert_eq!(binding.identifiers.route_constant, "ROUTE_GET_USER");
    assert_eq!(
        binding.identifiers.wire_route,
        "io.example.echo.EchoService.get_user"
    );
    assert_eq!(binding.handler_name, "doget_userRequestResponse");
}

#[test]
fn test_duplicate_name_fails_without_partial_table() {
    let service = ServiceDefinition::new("EchoService")
        .with_method(MethodDefinition::new("Echo", "A", "B"))
        .with_method(MethodDefinition::new("Other", "A", "B"))
        .with_method(MethodDefinition::new("Echo", "A", "B").server_streaming());

    let err = build_route_table(&service).unwrap_err();
    match err {
        CodegenError::DuplicateRoute {
            service,
            route_key,
            first,
            second,
        } => {
            assert_eq!(service, "EchoService");
            assert_eq!(route_key, "EchoService.METHOD_ECHO");
            assert_eq!(first, "Echo");
            assert_eq!(second, "Echo");
        }
        other => panic!("expected duplicate route, got {other:?}"),
    }
}

#[test]
fn test_names_colliding_after_casing_are_duplicates() {
    let service = ServiceDefinition::new("Users")
        .with_method(MethodDefinition::new("getUser", "A", "B"))
        .with_method(MethodDefinition::new("get_user", "A", "B"));

    let err = build_route_table(&service).unwrap_err();
    assert!(err.is_structural());
    assert_eq!(err.rule(), "DuplicateRoute");
    assert_eq!(err.service(), Some("Users"));
}

#[test]
fn test_invalid_method_name_names_service() {
    let service = ServiceDefinition::new("Users")
        .with_method(MethodDefinition::new("get-user", "A", "B"));

    let err = build_route_table(&service).unwrap_err();
    assert_eq!(err.rule(), "InvalidIdentifier");
    assert_eq!(err.service(), Some("Users"));
}

#[test]
fn test_long_method_name_gets_a_route() {
    let long = format!("get{}", "User".repeat(40));
    let service = ServiceDefinition::new("Svc").with_method(MethodDefinition::new(&long, "A", "B"));

    let table = build_route_table(&service).unwrap();
    let expected_key = format!("Svc.METHOD_GET{}", "_USER".repeat(40));
    let binding = table.get(&expected_key).unwrap();
    assert_eq!(binding.identifiers.lower_camel, long);
    assert_eq!(binding.identifiers.wire_route, format!("Svc.{long}"));
    assert_eq!(table.len(), 1);
}

// ========== Emission plan ==========

#[test]
fn test_plan_task_order() {
    let service = echo_service();
    let table = build_route_table(&service).unwrap();
    let plan = plan(&service, &table, &PlanOptions::default());

    let names = |kind| {
        plan.tasks_for(kind)
            .map(|task| task.method.name.as_str())
            .collect::<Vec<_>>()
    };

    let declared = vec!["Echo", "Notify", "Watch", "Chat", "Upload", "get_user"];
    assert_eq!(names(ArtifactKind::Interface), declared);
    assert_eq!(names(ArtifactKind::ClientStub), declared);
    assert_eq!(
        names(ArtifactKind::ServerStub),
        vec!["Notify", "Echo", "get_user", "Watch", "Chat", "Upload"]
    );

    // interface block, then client block, then server block
    let kinds = plan.tasks.iter().map(|task| task.artifact).collect::<Vec<_>>();
    let mut sorted = kinds.clone();
    sorted.sort();
    assert_eq!(kinds, sorted);
}

#[test]
fn test_server_tasks_carry_shape_options() {
    let plan = plan_service(&echo_service(), &PlanOptions::default()).unwrap();

    for task in plan.tasks_for(ArtifactKind::ServerStub) {
        let server = task.server.unwrap();
        assert!(server.metrics_decorator);
        assert_eq!(
            server.void_return,
            task.semantic == InteractionSemantic::OneWay,
            "{}",
            task.method.name
        );
    }
    assert!(
        plan.tasks_for(ArtifactKind::Interface)
            .chain(plan.tasks_for(ArtifactKind::ClientStub))
            .all(|task| task.server.is_none())
    );
}

#[test]
fn test_metrics_can_be_disabled() {
    let plan = plan_service(&echo_service(), &PlanOptions { metrics: false }).unwrap();
    assert!(
        plan.tasks_for(ArtifactKind::ServerStub)
            .all(|task| !task.server.unwrap().metrics_decorator)
    );
}

#[test]
fn test_empty_service_keeps_four_entry_points() {
    let plan = plan_service(&ServiceDefinition::new("Nothing"), &PlanOptions::default()).unwrap();

    assert!(plan.tasks.is_empty());
    assert!(plan.registrations.is_empty());
    assert_eq!(plan.summary.total(), 0);

    let entries = plan
        .entry_points
        .iter()
        .map(|entry| (entry.name.as_str(), entry.is_implemented()))
        .collect::<Vec<_>>();
    assert_eq!(
        entries,
        vec![
            ("fireAndForget", false),
            ("requestResponse", false),
            ("requestStream", false),
            ("requestChannel", false),
        ]
    );
    assert_eq!(
        plan.entry_points[3].unimplemented_message,
        "Request Channel is not implemented."
    );
}

#[test]
fn test_entry_point_wiring() {
    let plan = plan_service(&echo_service(), &PlanOptions::default()).unwrap();

    let unary = plan
        .entry_point(InteractionSemantic::UnarySingleResponse)
        .unwrap();
    assert_eq!(unary.strategy, DispatchStrategy::RouteSwitch);
    assert_eq!(
        unary.decoder_name.as_deref(),
        Some("doDecodeAndHandleRequestResponse")
    );
    let arms = unary
        .handlers
        .iter()
        .map(|h| (h.route_constant.as_str(), h.handler_name.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        arms,
        vec![
            ("ROUTE_ECHO", "doEchoRequestResponse"),
            ("ROUTE_GET_USER", "doget_userRequestResponse"),
        ]
    );

    let channel = plan
        .entry_point(InteractionSemantic::ClientOrBidiStream)
        .unwrap();
    assert_eq!(channel.strategy, DispatchStrategy::DecodeThenDispatch);
    assert_eq!(channel.decoder_name, None);
    assert_eq!(channel.handlers.len(), 2);
}

#[test]
fn test_registrations_follow_bucket_order() {
    let plan = plan_service(&echo_service(), &PlanOptions::default()).unwrap();

    let registrations = plan
        .registrations
        .iter()
        .map(|r| (r.registry.as_str(), r.handler_name.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        registrations,
        vec![
            ("fireAndForgetRegistry", "doNotifyFireAndForget"),
            ("requestResponseRegistry", "doEchoRequestResponse"),
            ("requestResponseRegistry", "doget_userRequestResponse"),
            ("requestStreamRegistry", "doWatchRequestStream"),
            ("requestChannelRegistry", "doChatRequestChannel"),
            ("requestChannelRegistry", "doUploadRequestChannel"),
        ]
    );
    assert_eq!(plan.summary.unary, 2);
    assert_eq!(plan.summary.channel, 2);
}

#[test]
fn test_planning_is_deterministic() {
    let service = echo_service();
    let first = plan_service(&service, &PlanOptions::default()).unwrap();
    let second = plan_service(&service, &PlanOptions::default()).unwrap();
    assert_eq!(first, second);
}
