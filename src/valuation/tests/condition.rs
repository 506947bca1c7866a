use super::common::*;
use crate::valuation::condition::{grade_for, score_condition, ConditionOutcome};
use crate::valuation::domain::{
    ConditionGrade, DentLevel, EngineNoise, EngineSmoke, GearboxCondition, InspectionReport,
    PartCondition,
};
use crate::valuation::rates::RateTables;

fn score(report: &InspectionReport) -> ConditionOutcome {
    score_condition(&RateTables::standard().condition, report)
}

#[test]
fn pristine_vehicle_scores_one_hundred() {
    let outcome = score(&pristine_inspection());
    assert_eq!(outcome.score, 100.0);
    assert_eq!(outcome.grade, ConditionGrade::Excellent);
    assert_eq!(outcome.multiplier, 1.10);
    assert!(outcome.findings.is_empty());
    assert_eq!(
        outcome.categories.labels().collect::<Vec<_>>(),
        vec![
            "engine_transmission",
            "body_frame",
            "mechanical",
            "comfort",
            "documentation"
        ]
    );
    assert_eq!(outcome.categories.get("engine_transmission"), Some(35.0));
    assert_eq!(outcome.breakdown.len(), 16);
}

#[test]
fn good_inspection_lands_in_good_grade() {
    let outcome = score(&good_inspection());
    assert_eq!(outcome.score, 65.0);
    assert_eq!(outcome.grade, ConditionGrade::Good);
    assert_eq!(outcome.multiplier, 1.0);
    assert!(outcome.findings.is_empty());
}

#[test]
fn frame_damage_always_lowers_engine_category() {
    let mut damaged = pristine_inspection();
    damaged.frame_damage = true;

    let intact = score(&pristine_inspection());
    let outcome = score(&damaged);

    assert_eq!(outcome.breakdown.get("frame_damage"), Some(-20.0));
    assert_eq!(outcome.categories.get("engine_transmission"), Some(10.0));
    assert!(
        outcome.categories.get("engine_transmission")
            < intact.categories.get("engine_transmission")
    );
    assert_eq!(outcome.score, 75.0);
    assert_eq!(outcome.grade, ConditionGrade::VeryGood);
    assert!(outcome.findings.warnings[0].starts_with("CRITICAL: Frame damage"));
}

#[test]
fn engine_smoke_warns_with_colour() {
    let mut report = pristine_inspection();
    report.engine_smoke = EngineSmoke::Black;
    let outcome = score(&report);
    assert_eq!(outcome.breakdown.get("engine_smoke"), Some(0.0));
    assert_eq!(
        outcome.findings.warnings,
        vec!["Engine smoke detected (Black). Major engine work may be required."]
    );
}

#[test]
fn tread_bands_and_worn_tire_warning() {
    let mut report = pristine_inspection();
    for (tread, points) in [(75, 7.0), (74, 5.0), (50, 5.0), (30, 2.0), (29, 0.0)] {
        report.tire_tread = tread;
        let outcome = score(&report);
        assert_eq!(outcome.breakdown.get("tire_tread"), Some(points), "tread {tread}");
        assert_eq!(outcome.findings.warnings.len(), usize::from(tread < 30));
    }
}

#[test]
fn worst_case_inspection_scores_zero_and_is_fair() {
    let report = InspectionReport {
        frame_damage: true,
        dents_scratches: DentLevel::Severe,
        repainted: true,
        engine_smoke: EngineSmoke::Black,
        tire_tread: 0,
        ac_working: false,
        electrical_issues: true,
        service_history: false,
        insurance_valid: false,
        accident_history: true,
        engine_noise: EngineNoise::Heavy,
        transmission_condition: GearboxCondition::Slipping,
        suspension_condition: PartCondition::Poor,
        brake_condition: PartCondition::Poor,
        interior_condition: PartCondition::Poor,
        rust_present: true,
    };
    let outcome = score(&report);

    assert_eq!(outcome.categories.get("engine_transmission"), Some(-20.0));
    assert_eq!(outcome.score, 0.0);
    assert_eq!(outcome.grade, ConditionGrade::Fair);
    assert_eq!(outcome.multiplier, 0.85);
    assert_eq!(outcome.findings.warnings.len(), 5);
}

#[test]
fn grade_thresholds_are_inclusive() {
    let rubric = RateTables::standard().condition;
    assert_eq!(grade_for(&rubric, 90.0), ConditionGrade::Excellent);
    assert_eq!(grade_for(&rubric, 89.99), ConditionGrade::VeryGood);
    assert_eq!(grade_for(&rubric, 75.0), ConditionGrade::VeryGood);
    assert_eq!(grade_for(&rubric, 50.0), ConditionGrade::Good);
    assert_eq!(grade_for(&rubric, 49.0), ConditionGrade::Fair);
}

#[test]
fn category_caps_limit_generous_rubrics() {
    let mut tables = RateTables::standard();
    tables.condition.ac_working_points = 50;
    let outcome = score_condition(&tables.condition, &pristine_inspection());
    assert_eq!(outcome.categories.get("comfort"), Some(15.0));
    assert_eq!(outcome.score, 100.0);
}
