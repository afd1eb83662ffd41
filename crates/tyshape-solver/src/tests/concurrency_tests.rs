//! Many containment queries against one shared, immutable registry.

use crate::codebase::{ClassLikeKind, ClassLikeStorage, CodebaseBuilder};
use crate::subtype::is_contained_by;
use crate::types::{TAtomic, TNamedObject};
use crate::union::TUnion;
use rayon::prelude::*;

#[test]
fn test_parallel_queries_share_one_codebase() {
    let mut builder = CodebaseBuilder::new();
    builder.add_classlike(ClassLikeStorage::new("Root", ClassLikeKind::Class));
    for idx in 0..64 {
        let parent = if idx == 0 {
            "Root".to_string()
        } else {
            format!("Node{}", idx - 1)
        };
        builder.add_classlike(
            ClassLikeStorage::new(format!("Node{idx}"), ClassLikeKind::Class).with_parent(parent),
        );
    }
    let codebase = builder.build();

    let results: Vec<(usize, bool, bool)> = (0..64usize)
        .into_par_iter()
        .map(|idx| {
            let node = TUnion::from_atomic(TAtomic::NamedObject(TNamedObject::new(format!("Node{idx}"))));
            let root = TUnion::from_atomic(TAtomic::named("Root"));
            let up = is_contained_by(&codebase, &node, &root);
            let down = is_contained_by(&codebase, &root, &node);
            (idx, up, down)
        })
        .collect();

    for (idx, up, down) in results {
        assert!(up, "Node{idx} should extend Root");
        assert!(!down, "Root should not extend Node{idx}");
    }
}
