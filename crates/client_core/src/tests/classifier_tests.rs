use super::*;

#[test]
fn scenario_indices_land_in_expected_tiers() {
    let good = classify(42.0);
    assert_eq!(good.category, AqiCategory::Good);
    assert_eq!(good.tier(), 1);

    let very_unhealthy = classify(275.0);
    assert_eq!(very_unhealthy.status(), "Very Unhealthy");
    assert_eq!(very_unhealthy.tier(), 5);

    let hazardous = classify(301.0);
    assert_eq!(hazardous.category, AqiCategory::Hazardous);
    assert_eq!(hazardous.tier(), 6);
}

#[test]
fn band_edges_fall_on_the_correct_side() {
    let cases = [
        (50.0, 1),
        (51.0, 2),
        (100.0, 2),
        (101.0, 3),
        (150.0, 3),
        (151.0, 4),
        (200.0, 4),
        (201.0, 5),
        (300.0, 5),
        (301.0, 6),
    ];
    for (index, tier) in cases {
        assert_eq!(classify(index).tier(), tier, "index {index}");
    }
}

#[test]
fn fractional_values_use_the_unrounded_index() {
    // 50.4 displays as 50 but is already past the Good band.
    let classification = classify(50.4);
    assert_eq!(classification.display_index(), 50);
    assert_eq!(classification.category, AqiCategory::Moderate);
    assert_eq!(classify(300.2).category, AqiCategory::Hazardous);
}

#[test]
fn every_sampled_index_maps_to_exactly_one_ascending_tier() {
    let mut previous_tier = 1;
    let mut index = 0.0;
    while index <= 1_000.0 {
        let tier = classify(index).tier();
        assert!((1..=6).contains(&tier));
        assert!(tier >= previous_tier, "tiers must not decrease at {index}");
        previous_tier = tier;
        index += 0.25;
    }
    assert_eq!(classify(f64::MAX).category, AqiCategory::Hazardous);
    assert_eq!(classify(f64::INFINITY).category, AqiCategory::Hazardous);
}

#[test]
fn out_of_domain_inputs_are_clamped_to_good() {
    assert_eq!(classify(-3.0).category, AqiCategory::Good);
    assert_eq!(classify(f64::NAN).category, AqiCategory::Good);
}

#[test]
fn categories_carry_fixed_presentation_data() {
    assert_eq!(AqiCategory::ALL.len(), 6);
    for (position, category) in AqiCategory::ALL.into_iter().enumerate() {
        assert_eq!(usize::from(category.tier()), position + 1);
        assert!(!category.advisory().is_empty());
    }
    assert_eq!(AqiCategory::Hazardous.range_label(), "301+");
    assert_eq!(AqiCategory::UnhealthySensitive.color(), ColorToken::Orange);
    assert!(AqiCategory::VeryUnhealthy.advisory().contains("Stay indoors"));
}

#[test]
fn display_rounds_half_up_for_positive_values() {
    assert_eq!(display_index(42.5), 43);
    assert_eq!(display_index(42.49), 42);
    assert_eq!(display_index(f64::NAN), 0);
}
