use tierbus_events::{
    Chain, Publisher, Registry, RegistryError, TopicView, args, create_registry,
};
use tierbus_test_support::{CallLog, Spy, init_test_logging};

struct Newsroom {
    desk: &'static str,
    wire: Registry<String>,
}

impl Newsroom {
    fn new(desk: &'static str) -> Self {
        Self {
            desk,
            wire: create_registry(),
        }
    }
}

impl Publisher<String> for Newsroom {
    fn registry(&self) -> &Registry<String> {
        &self.wire
    }
}

#[test]
fn every_operation_returns_the_host_for_chaining() -> anyhow::Result<()> {
    init_test_logging();
    let room = Newsroom::new("sports");
    let spy = Spy::new();

    let after_on = room.on("scores", spy.listener());
    assert!(std::ptr::eq(after_on, &room));
    let after_once = room.once("scores", spy.listener());
    assert!(std::ptr::eq(after_once, &room));
    let after_emit = room.emit("scores", &["3-1".to_string()]);
    assert!(std::ptr::eq(after_emit, &room));
    let after_off = room.off("scores", &spy.listener());
    assert!(std::ptr::eq(after_off, &room));
    let after_off_all = room.off_all("scores");
    assert!(std::ptr::eq(after_off_all, &room));
    let after_reset = room.reset();
    assert!(std::ptr::eq(after_reset, &room));
    let after_args = room.on_args(args!["scores", spy.listener()])?;
    assert!(std::ptr::eq(after_args, &room));
    let after_once_args = room.once_args(args!["scores", spy.listener()])?;
    assert!(std::ptr::eq(after_once_args, &room));
    let after_off_args = room.off_args(args!["scores"])?;
    assert!(std::ptr::eq(after_off_args, &room));

    assert_eq!(room.desk, "sports");
    assert_eq!(spy.call_count(), 2);
    Ok(())
}

#[test]
fn hosts_keep_independent_registries() {
    let sports = Newsroom::new("sports");
    let weather = Newsroom::new("weather");
    let sports_log = CallLog::new();
    let weather_log = CallLog::new();

    sports.on("bulletin", sports_log.listener("sports"));
    weather.on("bulletin", weather_log.listener("weather"));

    sports.emit("bulletin", &[]);

    assert_eq!(sports_log.entries(), ["sports"]);
    assert!(weather_log.entries().is_empty());
    assert!(weather.off_all("bulletin").get_listener().node(&Chain::from("bulletin")).is_some());
    assert_eq!(
        sports
            .get_listener()
            .node(&Chain::from("bulletin"))
            .map(TopicView::listener_count),
        Some(1)
    );
}

#[test]
fn variadic_segments_build_the_chain() -> anyhow::Result<()> {
    let registry = Registry::<String>::new();
    let spy = Spy::new();

    registry.on_args(args!["top", "tierA", spy.listener()])?;
    registry.emit(["top", "tierA", "tierB"], &["Lorem".to_string()]);
    registry.emit("top", &[]);

    assert_eq!(spy.calls(), vec![vec!["Lorem".to_string()]]);
    Ok(())
}

#[test]
fn variadic_once_fires_a_single_time() -> anyhow::Result<()> {
    let registry = Registry::<()>::new();
    let spy = Spy::new();

    registry
        .once_args(args!["top", spy.listener()])?
        .emit("top", &[])
        .emit("top", &[]);

    assert!(spy.called_once());
    Ok(())
}

#[test]
fn variadic_registration_without_a_listener_is_an_error() {
    let registry = Registry::<()>::new();

    let err = registry
        .on_args(args!["test"])
        .expect_err("a trailing listener is mandatory");
    assert!(matches!(
        err,
        RegistryError::InvalidArgument {
            operation: "on",
            ..
        }
    ));
    assert_eq!(err.to_string(), "illegal argument");

    let err = registry
        .once_args(Vec::new())
        .expect_err("an empty list has no listener");
    assert!(matches!(
        err,
        RegistryError::InvalidArgument {
            operation: "once",
            position: None,
            ..
        }
    ));
    assert!(registry.root().is_empty());
}

#[test]
fn variadic_removal_follows_the_trailing_listener_rule() -> anyhow::Result<()> {
    let registry = Registry::<()>::new();
    let removed = Spy::new();
    let kept = Spy::new();

    registry
        .on("top", removed.listener())
        .on("top", kept.listener())
        .on(["top", "tierA"], kept.listener());

    registry.off_args(args!["top", removed.listener()])?;
    registry.emit("top", &[]);
    assert_eq!(removed.call_count(), 0);
    assert!(kept.called_once());

    registry.off_args(args!["top"])?;
    registry.emit(["top", "tierA"], &[]);
    assert_eq!(kept.call_count(), 2);

    let err = registry
        .off_args(args![kept.listener(), "top"])
        .expect_err("listener must trail");
    assert!(matches!(
        err,
        RegistryError::InvalidArgument {
            operation: "off",
            position: Some(0),
            ..
        }
    ));
    Ok(())
}

#[test]
fn variadic_removal_without_arguments_resets() -> anyhow::Result<()> {
    let registry = Registry::<()>::new();
    let spy = Spy::new();

    registry
        .on(Chain::root(), spy.listener())
        .on(["a", "b"], spy.listener());
    registry.off_args(Vec::new())?;

    assert!(registry.get_listener().is_empty());
    registry.emit(["a", "b"], &[]);
    assert_eq!(spy.call_count(), 0);
    Ok(())
}

#[test]
fn a_lone_listener_subscribes_at_the_root() -> anyhow::Result<()> {
    let registry = Registry::<()>::new();
    let spy = Spy::new();

    registry.on_args(args![spy.listener()])?;
    registry.emit("anything", &[]);

    assert!(spy.called_once());
    assert_eq!(registry.get_listener().listener_count(), 1);
    Ok(())
}

#[test]
fn dotted_topics_match_segment_chains() {
    let registry = Registry::<()>::new();
    let spy = Spy::new();

    registry
        .on(Chain::from_dotted("top.tierA"), spy.listener())
        .emit(["top", "tierA"], &[]);

    assert!(spy.called_once());
}
