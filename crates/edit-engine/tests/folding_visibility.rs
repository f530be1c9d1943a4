use edit_engine::{FoldKind, FoldRegion, FoldingModel, TextRange};

fn region_10_to_20() -> FoldRegion {
    FoldRegion::new(TextRange::new(100, 209), 10, 20, FoldKind::Braces)
}

#[test]
fn test_visibility_scenario() {
    let mut model = FoldingModel::new();
    let region = region_10_to_20();
    model.update(vec![region.clone()]);
    assert!(model.fold(&region));

    assert!(!model.is_line_hidden(10), "start line hosts the affordance");
    assert!(model.is_line_hidden(15));
    assert!(model.is_line_hidden(20));
    assert!(!model.is_line_hidden(9));
    assert!(!model.is_line_hidden(21));
}

#[test]
fn test_fold_state_survives_identical_recatalog_only() {
    let mut model = FoldingModel::new();
    let region = region_10_to_20();
    model.update(vec![region.clone()]);
    model.fold(&region);

    // Identical catalog: state preserved.
    model.update(vec![region.clone()]);
    assert!(model.is_line_hidden(15));

    // A shifted region is a different value: folded state is lost.
    let mut shifted = region.clone();
    shifted.range = TextRange::new(101, 210);
    model.update(vec![shifted]);
    assert!(!model.is_line_hidden(15));
    assert!(model.folded_regions().is_empty());
}

#[test]
fn test_unfold_restores_visibility() {
    let mut model = FoldingModel::new();
    let region = region_10_to_20();
    model.update(vec![region.clone()]);

    model.fold(&region);
    assert!(model.is_line_hidden(12));
    assert!(model.unfold(&region));
    assert!(!model.is_line_hidden(12));
    assert!(!model.unfold(&region));
}

#[test]
fn test_fold_unknown_region_is_rejected() {
    let mut model = FoldingModel::new();
    model.update(vec![region_10_to_20()]);

    let stranger = FoldRegion::new(TextRange::new(0, 9), 0, 1, FoldKind::Comment);
    assert!(!model.fold(&stranger));
    assert!(!model.toggle_fold(&stranger));
    assert!(model.folded_regions().is_empty());
}

#[test]
fn test_overlapping_folds_union_visibility() {
    let mut model = FoldingModel::new();
    let a = FoldRegion::new(TextRange::new(0, 50), 0, 5, FoldKind::Braces);
    let b = FoldRegion::new(TextRange::new(30, 90), 3, 9, FoldKind::Braces);
    model.update(vec![a.clone(), b.clone()]);
    model.fold(&a);
    model.fold(&b);

    assert!(!model.is_line_hidden(0));
    assert!(model.is_line_hidden(3)); // hidden by `a` even though `b` starts there
    assert!(model.is_line_hidden(9));
    assert!(!model.is_line_hidden(10));
}
