use super::*;

#[test]
fn snapshot_encodes_all_five_fields_with_wire_names() {
    let mut state = CommandState::default();
    state.set_direction(Direction::Forward);
    assert_eq!(
        encode_snapshot(&state).expect("encode"),
        r#"{"direction":"Forward","speed":50,"headlightsOn":false,"hornOn":false,"battery":85}"#
    );

    state.set_horn(true);
    assert_eq!(
        encode_snapshot(&state).expect("encode"),
        r#"{"direction":"Forward","speed":50,"headlightsOn":false,"hornOn":true,"battery":85}"#
    );
}

#[test]
fn every_direction_uses_its_variant_name_on_the_wire() {
    for direction in Direction::ALL {
        let state = CommandState::default().apply(Intent::SetDirection(direction));
        let value: serde_json::Value =
            serde_json::from_str(&encode_snapshot(&state).expect("encode")).expect("json");
        assert_eq!(value["direction"], direction.as_str());
    }
}

#[test]
fn decode_rejects_out_of_range_speed() {
    let err = decode_snapshot(
        r#"{"direction":"Left","speed":150,"headlightsOn":false,"hornOn":false,"battery":85}"#,
    );
    assert!(err.is_err());
}

#[test]
fn decode_rejects_missing_fields() {
    assert!(decode_snapshot(r#"{"direction":"Left","speed":10}"#).is_err());
}

#[test]
fn apply_does_not_mutate_the_receiver() {
    let start = CommandState::default();
    let next = start.apply(Intent::Stop);
    assert_eq!(start.speed(), 50);
    assert_eq!(next.speed(), 0);
    assert_eq!(next.direction(), Direction::Neutral);
}

#[test]
fn toggles_flip_current_value() {
    let state = CommandState::default()
        .apply(Intent::ToggleHeadlights)
        .apply(Intent::ToggleHorn);
    assert!(state.headlights_on());
    assert!(state.horn_on());

    let state = state.apply(Intent::ToggleHorn);
    assert!(!state.horn_on());
    assert!(state.headlights_on());
}

#[test]
fn release_intent_is_a_no_op() {
    let state = CommandState::default().apply(Intent::SetDirection(Direction::Right));
    assert_eq!(state.apply(Intent::ReleaseDirection), state);
}

#[test]
fn intent_json_uses_tagged_form() {
    let json = serde_json::to_string(&Intent::SetDirection(Direction::Left)).expect("json");
    assert_eq!(json, r#"{"type":"set_direction","payload":"Left"}"#);
    let intent: Intent = serde_json::from_str(r#"{"type":"stop"}"#).expect("intent");
    assert_eq!(intent, Intent::Stop);
}

#[test]
fn parses_console_commands() {
    assert_eq!(
        "forward".parse::<Intent>(),
        Ok(Intent::SetDirection(Direction::Forward))
    );
    assert_eq!(
        "  Reverse ".parse::<Intent>(),
        Ok(Intent::SetDirection(Direction::Reverse))
    );
    assert_eq!("release".parse::<Intent>(), Ok(Intent::ReleaseDirection));
    assert_eq!("stop".parse::<Intent>(), Ok(Intent::Stop));
    assert_eq!("speed 72".parse::<Intent>(), Ok(Intent::SetSpeed(72)));
    assert_eq!("speed -5".parse::<Intent>(), Ok(Intent::SetSpeed(-5)));
    assert_eq!("lights on".parse::<Intent>(), Ok(Intent::SetHeadlights(true)));
    assert_eq!("lights".parse::<Intent>(), Ok(Intent::ToggleHeadlights));
    assert_eq!("horn off".parse::<Intent>(), Ok(Intent::SetHorn(false)));
    assert_eq!("horn toggle".parse::<Intent>(), Ok(Intent::ToggleHorn));
}

#[test]
fn reports_console_parse_errors() {
    assert_eq!("".parse::<Intent>(), Err(IntentParseError::Empty));
    assert_eq!(
        "jump".parse::<Intent>(),
        Err(IntentParseError::UnknownCommand("jump".to_string()))
    );
    assert!(matches!(
        "speed".parse::<Intent>(),
        Err(IntentParseError::MissingArgument { command: "speed", .. })
    ));
    assert!(matches!(
        "speed fast".parse::<Intent>(),
        Err(IntentParseError::InvalidArgument { command: "speed", .. })
    ));
    assert!(matches!(
        "horn loud".parse::<Intent>(),
        Err(IntentParseError::InvalidArgument { command: "horn", .. })
    ));
}
