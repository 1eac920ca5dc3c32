//! Two-pass renumbering never collides and always ends in stacking order

use onion_layers::host::{Host, MemoryHost};
use onion_layers::name::NumberedName;
use onion_layers::renumber::{renumber, FrameNames, RenumberPlan, TEMPORARY_MARKER};
use onion_layers::types::ItemId;
use proptest::prelude::*;
use std::collections::HashSet;

const CHILD_STEMS: [&str; 3] = ["ink", "paint", "paper"];

/// Per frame: its number, digit width, and which child stems it carries.
fn strip() -> impl Strategy<Value = Vec<(u64, usize, Vec<bool>)>> {
    prop::collection::vec(
        (0u64..200, 1usize..4, prop::collection::vec(any::<bool>(), 3)),
        1..10,
    )
}

fn numbered(stem: &str, number: u64, width: usize) -> String {
    format!("{}{:0w$}", stem, number, w = width)
}

fn frame_names(layout: &[(u64, usize, Vec<bool>)]) -> Vec<FrameNames> {
    let mut next = 0;
    let mut id = || {
        next += 1;
        ItemId(next)
    };
    layout.iter()
        .map(|(number, width, present)| FrameNames {
            item: id(),
            name: numbered("frame", *number, *width),
            children: CHILD_STEMS
                .iter()
                .zip(present)
                .filter(|(_, p)| **p)
                .map(|(stem, _)| (id(), numbered(stem, *number, *width)))
                .collect(),
        })
        .collect()
}

/// Temporary names are unique and never clash with a current or final name
#[test]
fn test_plan_is_collision_free_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&strip(), |layout| {
            let frames = frame_names(&layout);
            let plan = RenumberPlan::from_names(&frames);

            let current: HashSet<&str> = frames
                .iter()
                .flat_map(|f| {
                    std::iter::once(f.name.as_str())
                        .chain(f.children.iter().map(|(_, n)| n.as_str()))
                })
                .collect();
            let temporary = plan.temporary_names();

            prop_assert_eq!(temporary.len(), plan.renames.len());
            prop_assert_eq!(plan.final_names().len(), plan.renames.len());
            prop_assert!(temporary.is_disjoint(&current));
            prop_assert!(temporary.is_disjoint(&plan.final_names()));
            for rename in &plan.renames {
                prop_assert!(rename.temporary.starts_with(TEMPORARY_MARKER));
                prop_assert_ne!(&rename.from, &rename.to);
            }

            Ok(())
        })
        .unwrap();
}

proptest! {
    /// After renumbering, position p of N carries number N - p everywhere
    #[test]
    fn test_renumber_matches_stacking_order(layout in strip()) {
        let mut host = MemoryHost::new(8, 8);
        for (number, width, present) in &layout {
            let frame = host.add_group(None, &numbered("frame", *number, *width)).unwrap();
            for (stem, _) in CHILD_STEMS.iter().zip(present).filter(|(_, p)| **p) {
                host.add_layer(Some(frame), &numbered(stem, *number, *width)).unwrap();
            }
        }

        renumber(&mut host).unwrap();
        prop_assert_eq!(host.change_group_depth(), 0);

        let top = host.top_level_items().unwrap();
        let count = top.len() as u64;
        for (position, frame) in top.iter().enumerate() {
            let expected = Some(count - position as u64);
            let name = host.name(*frame).unwrap();
            prop_assert_eq!(NumberedName::parse(&name).number, expected);
            for child in host.children(*frame).unwrap().unwrap_or_default() {
                let child_name = host.name(child).unwrap();
                prop_assert!(!child_name.contains(TEMPORARY_MARKER));
                prop_assert_eq!(NumberedName::parse(&child_name).number, expected);
            }
        }

        // A second pass has nothing left to do.
        prop_assert_eq!(renumber(&mut host).unwrap(), 0);
    }
}
