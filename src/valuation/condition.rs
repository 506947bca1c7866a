use super::breakdown::Breakdown;
use super::domain::{
    ConditionGrade, DentLevel, EngineNoise, EngineSmoke, GearboxCondition, InspectionReport,
};
use super::findings::Findings;
use super::rates::ConditionRubric;

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionOutcome {
    /// 0-100 inclusive.
    pub score: f64,
    pub grade: ConditionGrade,
    pub multiplier: f64,
    /// Points awarded per inspection field.
    pub breakdown: Breakdown,
    /// Capped sub-score per category.
    pub categories: Breakdown,
    pub findings: Findings,
}

/// Scores the 16-point inspection into five capped categories.
pub fn score_condition(rubric: &ConditionRubric, report: &InspectionReport) -> ConditionOutcome {
    let mut breakdown = Breakdown::new();
    let mut findings = Findings::new();
    let mut categories = Breakdown::new();

    let engine = engine_points(rubric, report, &mut breakdown, &mut findings);
    categories.insert("engine_transmission", capped(engine, rubric.caps.engine));

    let body = body_points(rubric, report, &mut breakdown);
    categories.insert("body_frame", capped(body, rubric.caps.body));

    let mechanical = mechanical_points(rubric, report, &mut breakdown, &mut findings);
    categories.insert("mechanical", capped(mechanical, rubric.caps.mechanical));

    let comfort = comfort_points(rubric, report, &mut breakdown, &mut findings);
    categories.insert("comfort", capped(comfort, rubric.caps.comfort));

    let documentation = documentation_points(rubric, report, &mut breakdown, &mut findings);
    categories.insert(
        "documentation",
        capped(documentation, rubric.caps.documentation),
    );

    let score = categories.total().clamp(0.0, 100.0);
    let grade = grade_for(rubric, score);

    ConditionOutcome {
        score,
        grade,
        multiplier: multiplier_for(rubric, grade),
        breakdown,
        categories,
        findings,
    }
}

pub fn grade_for(rubric: &ConditionRubric, score: f64) -> ConditionGrade {
    let thresholds = &rubric.grade_thresholds;
    if score >= thresholds.excellent {
        ConditionGrade::Excellent
    } else if score >= thresholds.very_good {
        ConditionGrade::VeryGood
    } else if score >= thresholds.good {
        ConditionGrade::Good
    } else {
        ConditionGrade::Fair
    }
}

pub fn multiplier_for(rubric: &ConditionRubric, grade: ConditionGrade) -> f64 {
    let multipliers = &rubric.grade_multipliers;
    match grade {
        ConditionGrade::Excellent => multipliers.excellent,
        ConditionGrade::VeryGood => multipliers.very_good,
        ConditionGrade::Good => multipliers.good,
        ConditionGrade::Fair => multipliers.fair,
    }
}

// Sub-scores are capped from above only, so a frame-damage deduction is never absorbed.
fn capped(points: i32, cap: i32) -> f64 {
    f64::from(points.min(cap))
}

fn award(breakdown: &mut Breakdown, label: &str, points: i32) -> i32 {
    breakdown.insert(label, f64::from(points));
    points
}

fn engine_points(
    rubric: &ConditionRubric,
    report: &InspectionReport,
    breakdown: &mut Breakdown,
    findings: &mut Findings,
) -> i32 {
    let frame = if report.frame_damage {
        findings.warn("CRITICAL: Frame damage detected. Vehicle may be unsafe/unsellable.");
        rubric.frame_damage_points
    } else {
        rubric.frame_intact_points
    };

    let smoke = match report.engine_smoke {
        EngineSmoke::None => rubric.engine_smoke.none,
        EngineSmoke::White => rubric.engine_smoke.white,
        EngineSmoke::Black => rubric.engine_smoke.black,
    };
    if report.engine_smoke != EngineSmoke::None {
        findings.warn(format!(
            "Engine smoke detected ({}). Major engine work may be required.",
            report.engine_smoke.label()
        ));
    }

    let noise = match report.engine_noise {
        EngineNoise::Normal => rubric.engine_noise.normal,
        EngineNoise::Slight => rubric.engine_noise.slight,
        EngineNoise::Heavy => rubric.engine_noise.heavy,
    };

    let gearbox = match report.transmission_condition {
        GearboxCondition::Smooth => rubric.gearbox.smooth,
        GearboxCondition::Rough => rubric.gearbox.rough,
        GearboxCondition::Slipping => rubric.gearbox.slipping,
    };

    award(breakdown, "frame_damage", frame)
        + award(breakdown, "engine_smoke", smoke)
        + award(breakdown, "engine_noise", noise)
        + award(breakdown, "transmission", gearbox)
}

fn body_points(
    rubric: &ConditionRubric,
    report: &InspectionReport,
    breakdown: &mut Breakdown,
) -> i32 {
    let dents = match report.dents_scratches {
        DentLevel::None => rubric.dents.none,
        DentLevel::Minor => rubric.dents.minor,
        DentLevel::Moderate => rubric.dents.moderate,
        DentLevel::Severe => rubric.dents.severe,
    };
    let paint = if report.repainted {
        0
    } else {
        rubric.not_repainted_points
    };
    let rust = if report.rust_present {
        0
    } else {
        rubric.rust_free_points
    };

    award(breakdown, "dents_scratches", dents)
        + award(breakdown, "repainted", paint)
        + award(breakdown, "rust", rust)
}

fn mechanical_points(
    rubric: &ConditionRubric,
    report: &InspectionReport,
    breakdown: &mut Breakdown,
    findings: &mut Findings,
) -> i32 {
    let tread = match rubric
        .tire_tread_bands
        .iter()
        .find(|band| report.tire_tread >= band.min_percent)
    {
        Some(band) => band.points,
        None => {
            findings.warn("Tires critically worn. Immediate replacement required.");
            rubric.worn_tire_points
        }
    };

    award(breakdown, "tire_tread", tread)
        + award(
            breakdown,
            "suspension",
            rubric.suspension.points(report.suspension_condition),
        )
        + award(breakdown, "brakes", rubric.brakes.points(report.brake_condition))
}

fn comfort_points(
    rubric: &ConditionRubric,
    report: &InspectionReport,
    breakdown: &mut Breakdown,
    findings: &mut Findings,
) -> i32 {
    let ac = if report.ac_working {
        rubric.ac_working_points
    } else {
        0
    };
    let electrical = if report.electrical_issues {
        findings.warn("Electrical issues reported. Diagnostics recommended.");
        0
    } else {
        rubric.electrical_ok_points
    };

    award(breakdown, "ac", ac)
        + award(breakdown, "electrical", electrical)
        + award(
            breakdown,
            "interior",
            rubric.interior.points(report.interior_condition),
        )
}

fn documentation_points(
    rubric: &ConditionRubric,
    report: &InspectionReport,
    breakdown: &mut Breakdown,
    findings: &mut Findings,
) -> i32 {
    let service = if report.service_history {
        rubric.service_history_points
    } else {
        0
    };
    let insurance = if report.insurance_valid {
        rubric.insurance_valid_points
    } else {
        0
    };
    let accident = if report.accident_history {
        findings.warn("Accident history reported. Detailed inspection recommended.");
        0
    } else {
        rubric.accident_free_points
    };

    award(breakdown, "service_history", service)
        + award(breakdown, "insurance", insurance)
        + award(breakdown, "accident_history", accident)
}
