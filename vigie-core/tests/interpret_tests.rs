// Tests for score interpretation

use vigie_client::{AxisScore, Orientation, SiteKind};
use vigie_core::interpret::{
    IaLabel, Interpretation, OrientationReading, ScoreCard, ScoreColor, color_for, ia_label_for,
    interpretation_for, orientation_reading_for, orientation_text_for, site_kind_label,
};

// ============================================================================
// Color Band Tests
// ============================================================================

#[test]
fn test_color_for_bands() {
    assert_eq!(color_for(10.0), ScoreColor::Good);
    assert_eq!(color_for(7.0), ScoreColor::Good);
    assert_eq!(color_for(6.99), ScoreColor::Warning);
    assert_eq!(color_for(5.0), ScoreColor::Warning);
    assert_eq!(color_for(4.99), ScoreColor::Poor);
    assert_eq!(color_for(0.0), ScoreColor::Poor);
}

#[test]
fn test_color_hex_values() {
    assert_eq!(ScoreColor::Good.hex(), "#4CAF50");
    assert_eq!(ScoreColor::Warning.hex(), "#C9AD01");
    assert_eq!(ScoreColor::Poor.hex(), "#FF6B6B");
}

// ============================================================================
// Interpretation Tests
// ============================================================================

#[test]
fn test_interpretation_bands() {
    assert_eq!(interpretation_for(9.1), Interpretation::Excellent);
    assert_eq!(interpretation_for(8.0), Interpretation::Excellent);
    assert_eq!(interpretation_for(7.99), Interpretation::Good);
    assert_eq!(interpretation_for(6.0), Interpretation::Good);
    assert_eq!(interpretation_for(5.99), Interpretation::Average);
    assert_eq!(interpretation_for(4.0), Interpretation::Average);
    assert_eq!(interpretation_for(3.99), Interpretation::Weak);
}

#[test]
fn test_interpretation_messages_are_distinct() {
    let messages = [
        Interpretation::Excellent.message(),
        Interpretation::Good.message(),
        Interpretation::Average.message(),
        Interpretation::Weak.message(),
    ];
    for (i, a) in messages.iter().enumerate() {
        for b in messages.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

// ============================================================================
// IA Label Tests
// ============================================================================

#[test]
fn test_ia_label_core_value_boundary() {
    assert_eq!(ia_label_for(8.0), IaLabel::CoreValue);
    assert_eq!(ia_label_for(7.9), IaLabel::StrategicLever);
}

#[test]
fn test_ia_label_all_bands() {
    assert_eq!(ia_label_for(10.0), IaLabel::CoreValue);
    assert_eq!(ia_label_for(6.5), IaLabel::StrategicLever);
    assert_eq!(ia_label_for(6.4), IaLabel::WorthConsidering);
    assert_eq!(ia_label_for(4.5), IaLabel::WorthConsidering);
    assert_eq!(ia_label_for(4.4), IaLabel::Premature);
    assert_eq!(ia_label_for(2.5), IaLabel::Premature);
    assert_eq!(ia_label_for(2.4), IaLabel::NotRelevant);
    assert_eq!(ia_label_for(0.0), IaLabel::NotRelevant);
}

#[test]
fn test_ia_label_names() {
    assert_eq!(IaLabel::CoreValue.to_string(), "core value");
    assert_eq!(IaLabel::StrategicLever.to_string(), "strategic lever");
    assert_eq!(IaLabel::WorthConsidering.to_string(), "worth considering");
    assert_eq!(IaLabel::Premature.to_string(), "premature");
    assert_eq!(IaLabel::NotRelevant.to_string(), "not relevant");
}

// ============================================================================
// Orientation Tests
// ============================================================================

#[test]
fn test_hybrid_orientation() {
    assert_eq!(
        orientation_reading_for(Orientation::Hybride, 7.0, 7.0),
        Some(OrientationReading::ExcellentBalance)
    );
    assert_eq!(
        orientation_reading_for(Orientation::Hybride, 5.0, 5.0),
        Some(OrientationReading::GoodBalance)
    );
    assert_eq!(
        orientation_reading_for(Orientation::Hybride, 3.0, 4.0),
        Some(OrientationReading::ImprovableBalance)
    );
    assert_eq!(
        orientation_reading_for(Orientation::Hybride, 9.0, 6.9),
        Some(OrientationReading::GoodBalance)
    );
}

#[test]
fn test_ia_orientation() {
    assert_eq!(
        orientation_reading_for(Orientation::Ia, 3.0, 9.0),
        Some(OrientationReading::IaOnlyViable)
    );
    assert_eq!(
        orientation_reading_for(Orientation::Ia, 6.0, 9.0),
        Some(OrientationReading::StronglyIaFavored)
    );
    assert_eq!(
        orientation_reading_for(Orientation::Ia, 6.0, 8.0),
        Some(OrientationReading::StronglyIaFavored)
    );
    assert_eq!(
        orientation_reading_for(Orientation::Ia, 6.0, 7.5),
        Some(OrientationReading::IaFavored)
    );
}

#[test]
fn test_seo_orientation_mirrors_ia() {
    assert_eq!(
        orientation_reading_for(Orientation::Seo, 9.0, 3.0),
        Some(OrientationReading::SeoOnlyViable)
    );
    assert_eq!(
        orientation_reading_for(Orientation::Seo, 9.0, 6.0),
        Some(OrientationReading::StronglySeoFavored)
    );
    assert_eq!(
        orientation_reading_for(Orientation::Seo, 7.0, 6.0),
        Some(OrientationReading::SeoFavored)
    );
}

#[test]
fn test_orientation_text() {
    assert!(orientation_text_for(Orientation::Hybride, 7.0, 7.0).starts_with("Excellent!"));
    assert!(orientation_text_for(Orientation::Ia, 3.0, 9.0).contains("SEO potential is low"));
    assert!(orientation_text_for(Orientation::Ia, 6.0, 9.0).contains("significantly"));
    assert_eq!(orientation_text_for(Orientation::Other, 7.0, 7.0), "");
}

// ============================================================================
// Score Card Tests
// ============================================================================

#[test]
fn test_score_card_from_hundred_scale() {
    let axis: AxisScore = serde_json::from_str(r#"{"score": 72, "maxScore": 100}"#).unwrap();
    let card = ScoreCard::seo(&axis);

    assert!((card.score_on_10 - 7.2).abs() < 1e-9);
    assert_eq!(card.color, ScoreColor::Good);
    assert_eq!(card.interpretation, Interpretation::Good);
    assert_eq!(card.ia_label, None);
}

#[test]
fn test_score_card_ia_uses_score_on_ten() {
    let axis: AxisScore =
        serde_json::from_str(r#"{"score": 30, "scoreOn10": 8.2, "maturityOn100": 90}"#).unwrap();
    let card = ScoreCard::ia(&axis);

    assert_eq!(card.score_on_10, 8.2);
    assert_eq!(card.ia_label, Some(IaLabel::CoreValue));
}

#[test]
fn test_site_kind_labels() {
    assert!(site_kind_label(SiteKind::Ecommerce).contains("E-commerce"));
    assert!(site_kind_label(SiteKind::Unknown).contains("Unknown"));
}
