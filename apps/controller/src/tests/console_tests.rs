use super::*;
use shared::domain::Direction;

fn view() -> (
    ConsoleView,
    watch::Sender<CommandState>,
    watch::Sender<ChannelStatus>,
) {
    let (snapshots_tx, snapshots_rx) = watch::channel(CommandState::default());
    let (status_tx, status_rx) = watch::channel(ChannelStatus::Connecting);
    (
        ConsoleView::new(snapshots_rx, status_rx),
        snapshots_tx,
        status_tx,
    )
}

#[test]
fn renders_snapshot_and_link_status() {
    let mut state = CommandState::default();
    state.set_direction(Direction::Left);
    state.set_horn(true);
    assert_eq!(
        render(&state, ChannelStatus::Open),
        "direction=Left speed=50% lights=off horn=on battery=85% link=Open"
    );
}

#[test]
fn view_tracks_latest_values() {
    let (view, snapshots_tx, status_tx) = view();
    let mut state = CommandState::default();
    state.stop();
    snapshots_tx.send_replace(state);
    status_tx.send_replace(ChannelStatus::Errored);
    assert_eq!(
        view.render(),
        "direction=Neutral speed=0% lights=off horn=off battery=85% link=Errored"
    );
}

#[tokio::test]
async fn forwards_parsed_lines_until_quit() {
    let (view, _snapshots_tx, _status_tx) = view();
    let (lines_tx, lines_rx) = mpsc::channel(16);
    let (intents_tx, mut intents_rx) = mpsc::channel(16);

    for line in [
        "forward",
        "",
        "bogus",
        "status",
        "speed 72",
        "horn",
        "quit",
        "stop",
    ] {
        lines_tx.send(line.to_string()).await.expect("queue line");
    }

    forward_intents(lines_rx, intents_tx, view).await;

    let mut received = Vec::new();
    while let Some(intent) = intents_rx.recv().await {
        received.push(intent);
    }
    assert_eq!(
        received,
        vec![
            Intent::SetDirection(Direction::Forward),
            Intent::SetSpeed(72),
            Intent::ToggleHorn,
        ]
    );
}

#[tokio::test]
async fn end_of_input_ends_forwarding() {
    let (view, _snapshots_tx, _status_tx) = view();
    let (lines_tx, lines_rx) = mpsc::channel(4);
    let (intents_tx, mut intents_rx) = mpsc::channel(4);

    lines_tx.send("lights on".to_string()).await.expect("queue line");
    drop(lines_tx);

    forward_intents(lines_rx, intents_tx, view).await;
    assert_eq!(intents_rx.recv().await, Some(Intent::SetHeadlights(true)));
    assert_eq!(intents_rx.recv().await, None);
}
