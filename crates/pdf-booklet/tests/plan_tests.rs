use pdf_booklet::*;

#[test]
fn test_single_page_range() {
    let plan = SignaturePlan::compute(1, 5, 5).unwrap();

    assert_eq!(plan.total_pages(), 1);
    assert_eq!(plan.slots_per_signature(), 4);
    assert_eq!(plan.full_signature_count(), 0);
    assert_eq!(plan.signature_count(), 1);
    assert_eq!(plan.last_signature_first_page(), 5);
    assert_eq!(plan.last_signature_page_count(), 1);
    assert_eq!(plan.last_signature_blank_count(), 3);
}

#[test]
fn test_exact_multiple_leaves_last_signature_full() {
    // 8 pages, 4 slots per signature: two full signatures
    let plan = SignaturePlan::compute(1, 1, 8).unwrap();

    assert_eq!(plan.full_signature_count(), 1);
    assert_eq!(plan.signature_count(), 2);
    assert_eq!(plan.last_signature_first_page(), 5);
    assert_eq!(plan.last_signature_page_count(), 4);
    assert_eq!(plan.last_signature_blank_count(), 0);
}

#[test]
fn test_partial_last_signature() {
    // 2 sheets = 8 slots; 10 pages = one full signature + 2 pages
    let plan = SignaturePlan::compute(2, 1, 10).unwrap();

    assert_eq!(plan.slots_per_signature(), 8);
    assert_eq!(plan.full_signature_count(), 1);
    assert_eq!(plan.signature_count(), 2);
    assert_eq!(plan.last_signature_first_page(), 9);
    assert_eq!(plan.last_signature_page_count(), 2);
    assert_eq!(plan.last_signature_blank_count(), 6);
    assert_eq!(plan.total_slots(), 16);
    assert_eq!(plan.total_sheets(), 4);
}

#[test]
fn test_range_not_starting_at_one() {
    let plan = SignaturePlan::compute(1, 3, 9).unwrap();

    assert_eq!(plan.total_pages(), 7);
    assert_eq!(plan.signature_count(), 2);
    assert_eq!(plan.last_signature_first_page(), 7);
    assert_eq!(plan.last_signature_page_count(), 3);
    assert_eq!(plan.last_signature_blank_count(), 1);
}

#[test]
fn test_max_sheets_with_single_page() {
    let plan = SignaturePlan::compute(constants::MAX_SHEETS_PER_SIGNATURE, 1, 1).unwrap();

    assert_eq!(plan.slots_per_signature(), 32);
    assert_eq!(plan.signature_count(), 1);
    assert_eq!(plan.last_signature_page_count(), 1);
    assert_eq!(plan.last_signature_blank_count(), 31);
}

#[test]
fn test_rejects_reversed_range() {
    let result = SignaturePlan::compute(1, 6, 5);
    assert!(matches!(result, Err(BookletError::InvalidRange(_))));
}

#[test]
fn test_rejects_zero_first_page() {
    let result = SignaturePlan::compute(1, 0, 5);
    assert!(matches!(result, Err(BookletError::InvalidRange(_))));
}

#[test]
fn test_rejects_zero_sheets() {
    let result = SignaturePlan::compute(0, 1, 5);
    assert!(matches!(result, Err(BookletError::InvalidRange(_))));
}

#[test]
fn test_rejects_sheet_count_too_large_to_plan() {
    for sheets in [usize::MAX / 2, usize::MAX / 4 + 1, usize::MAX] {
        let result = SignaturePlan::compute(sheets, 1, 1);
        assert!(matches!(result, Err(BookletError::InvalidRange(_))));
        assert!(SignatureConfig::new(sheets).is_err());
    }

    // Largest count whose slot total still fits
    let config = SignatureConfig::new(usize::MAX / 4).unwrap();
    assert_eq!(config.slots_per_signature(), (usize::MAX / 4) * 4);
}

#[test]
fn test_signature_spans() {
    let plan = SignaturePlan::compute(1, 1, 10).unwrap();
    let spans: Vec<SignatureSpan> = plan.signatures().collect();

    assert_eq!(spans.len(), 3);
    assert_eq!(
        spans[0],
        SignatureSpan {
            index: 0,
            first_page: 1,
            page_count: 4,
            blank_count: 0
        }
    );
    assert_eq!(spans[1].first_page, 5);
    assert_eq!(
        spans[2],
        SignatureSpan {
            index: 2,
            first_page: 9,
            page_count: 2,
            blank_count: 2
        }
    );
    assert_eq!(plan.signature(3), None);
}

#[test]
fn test_plan_counts_hold_across_inputs() {
    for sheets in 1..=8 {
        for first in 1..=3 {
            for last in first..first + 70 {
                let plan = SignaturePlan::compute(sheets, first, last).unwrap();
                let slots = plan.slots_per_signature();

                assert!(plan.last_signature_blank_count() < slots);
                assert!(plan.last_signature_page_count() >= 1);
                assert_eq!(
                    plan.last_signature_page_count() + plan.last_signature_blank_count(),
                    slots
                );

                let pages: usize = plan.signatures().map(|s| s.page_count).sum();
                let blanks: usize = plan.signatures().map(|s| s.blank_count).sum();
                assert_eq!(pages, plan.total_pages());
                assert_eq!(pages + blanks, plan.signature_count() * slots);

                // Blanks are minimal: one fewer signature could not hold the pages
                assert!((plan.signature_count() - 1) * slots < plan.total_pages());
            }
        }
    }
}

#[test]
fn test_recompute_is_deterministic() {
    let a = SignaturePlan::compute(3, 4, 41).unwrap();
    let b = SignaturePlan::compute(3, 4, 41).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_from_parts_matches_compute() {
    let config = SignatureConfig::new(2).unwrap();
    let range = PageRange::new(2, 20).unwrap();
    let plan = SignaturePlan::from_parts(config, range);

    assert_eq!(plan, SignaturePlan::compute(2, 2, 20).unwrap());
    assert_eq!(plan.config(), config);
    assert_eq!(plan.range(), range);
}
