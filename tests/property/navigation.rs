//! Stepping wraps around the frame stack in both directions

use onion_layers::host::{Host, MemoryHost};
use onion_layers::navigation::{navigate, ContextWindow, NavigationRequest, NavigationSettings};
use proptest::prelude::*;

fn strip(count: usize, current: usize) -> MemoryHost {
    let mut host = MemoryHost::new(8, 8);
    for i in 0..count {
        let frame = host.add_group(None, &format!("frame{:02}", count - i)).unwrap();
        host.add_layer(Some(frame), &format!("ink{:02}", count - i)).unwrap();
        host.set_visible(frame, i == current).unwrap();
    }
    host
}

fn visible(host: &MemoryHost) -> Vec<usize> {
    host.top_level_items()
        .unwrap()
        .iter()
        .enumerate()
        .filter(|(_, id)| host.visible(**id).unwrap())
        .map(|(i, _)| i)
        .collect()
}

proptest! {
    /// Moving by any increment lands on (current + increment) mod N
    #[test]
    fn test_step_wraps_around(
        (count, current) in (1usize..10).prop_flat_map(|n| (Just(n), 0..n)),
        increment in -25isize..25,
    ) {
        let mut host = strip(count, current);
        let request = NavigationRequest::step(increment, Some(ContextWindow::focus_only()));
        navigate(&mut host, &request, &NavigationSettings::default()).unwrap();

        let expected = (current as isize + increment).rem_euclid(count as isize) as usize;
        prop_assert_eq!(visible(&host), vec![expected]);
        prop_assert_eq!(host.change_group_depth(), 0);
    }

    /// Going there and back returns to the starting frame
    #[test]
    fn test_step_is_reversible(
        (count, current) in (1usize..10).prop_flat_map(|n| (Just(n), 0..n)),
        increment in -25isize..25,
    ) {
        let mut host = strip(count, current);
        let settings = NavigationSettings::default();
        let there = NavigationRequest::step(increment, Some(ContextWindow::focus_only()));
        let back = NavigationRequest::step(-increment, Some(ContextWindow::focus_only()));
        navigate(&mut host, &there, &settings).unwrap();
        navigate(&mut host, &back, &settings).unwrap();

        prop_assert_eq!(visible(&host), vec![current]);
    }
}

/// The auto window read back from the image matches what was applied
#[test]
fn test_applied_window_is_read_back_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let slots = (
        prop::option::of(1u8..100),
        prop::option::of(1u8..100),
        3usize..8,
    );

    runner
        .run(&slots, |(before, after, count)| {
            let mut host = strip(count, 0);
            let window = ContextWindow::new(vec![
                before.map(f64::from),
                Some(100.0),
                after.map(f64::from),
            ]);
            let settings = NavigationSettings::default();
            navigate(&mut host, &NavigationRequest::step(1, Some(window.clone())), &settings)
                .unwrap();

            let seen = navigate(&mut host, &NavigationRequest::query(), &settings)
                .unwrap()
                .unwrap();
            prop_assert_eq!(seen, window);

            Ok(())
        })
        .unwrap();
}
