use super::{relative_difference, verdict, ChartBar, ComparisonChart, GroupReport, Report, Verdict};
use crate::generate::{GroupConfig, Uplift};
use crate::stats::{Alternative, SummaryStats, TestResult};

/// Confidence level as a percentage label, e.g. `95`, `97.5` or `99.99`.
fn percent_label(level: f64) -> String {
    let label = format!("{:.4}", level * 100.0);
    label.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn chart_bar(config: &GroupConfig, stats: &SummaryStats) -> ChartBar {
    ChartBar {
        label: config.label.clone(),
        rate: stats.rate,
        ci_lower: stats.ci_lower,
        ci_upper: stats.ci_upper,
        lower_error: stats.lower_extent(),
        upper_error: stats.upper_extent(),
    }
}

fn build_chart(
    config_control: &GroupConfig,
    config_treatment: &GroupConfig,
    stats_control: &SummaryStats,
    stats_treatment: &SummaryStats,
    test: &TestResult,
) -> ComparisonChart {
    let top = stats_control.rate.max(stats_treatment.rate) * 1.2;
    let y_max = if top > 0.1 { top } else { 0.15 };

    ComparisonChart {
        title: format!(
            "A/B Test Conversion Rates with {}% Confidence Intervals",
            percent_label(stats_control.confidence_level)
        ),
        y_label: "Conversion Rate".to_string(),
        y_max,
        bars: vec![
            chart_bar(config_control, stats_control),
            chart_bar(config_treatment, stats_treatment),
        ],
        annotation: format!(
            "P-value: {:.4}\nT-stat: {:.2}",
            test.p_value, test.t_statistic
        ),
    }
}

fn describe_alternative(alternative: Alternative) -> &'static str {
    match alternative {
        Alternative::TwoSided => "differs from",
        Alternative::Greater => "is greater than",
        Alternative::Less => "is less than",
    }
}

fn describe_uplift(uplift: &Uplift) -> String {
    match uplift {
        Uplift::Absolute(delta) => format!("{:+.4} (absolute)", delta),
        Uplift::Relative(ratio) => format!("{:+.2}% (relative)", ratio * 100.0),
    }
}

fn configuration_lines(
    lines: &mut Vec<String>,
    control: &GroupConfig,
    treatment: &GroupConfig,
    stats: &SummaryStats,
    test: &TestResult,
) {
    lines.push("\n### Experiment Configuration:".to_string());
    lines.push(format!(
        "  * {} Group Size: `{}`",
        control.label, control.sample_size
    ));
    lines.push(format!(
        "  * {} Group Size: `{}`",
        treatment.label, treatment.sample_size
    ));
    if let Some(baseline) = control.baseline_rate {
        lines.push(format!("  * Baseline Conversion Rate: `{:.4}`", baseline));
    }
    if treatment.baseline_rate.is_some() {
        lines.push(format!(
            "  * Expected Uplift: `{}`",
            describe_uplift(&treatment.uplift)
        ));
    }
    if let Some(seed) = control.seed {
        lines.push(format!("  * Random Seed: `{}`", seed));
    }
    lines.push(format!(
        "  * Significance Level (alpha): `{:.3}`",
        test.threshold
    ));
    lines.push(format!(
        "  * Confidence Level: `{}%`",
        percent_label(stats.confidence_level)
    ));
    lines.push(format!(
        "  * Alternative Hypothesis: `{}`",
        test.alternative
    ));
}

fn group_line(config: &GroupConfig, stats: &SummaryStats) -> String {
    format!(
        "  * {} Conversion Rate: `{:.4}` (`{:.4}`, `{:.4}`), {} of {} converted",
        config.label, stats.rate, stats.ci_lower, stats.ci_upper, stats.successes, stats.count
    )
}

fn conclusion(test: &TestResult) -> String {
    if test.is_significant {
        let mut text = format!(
            "The p-value (`{:.4}`) is less than alpha (`{:.3}`).\n\
             We **reject the null hypothesis**: the treatment conversion rate {} the control rate.",
            test.p_value,
            test.threshold,
            describe_alternative(test.alternative)
        );
        match verdict(test) {
            Verdict::Increase => text.push_str(
                "\n_The treatment group showed a statistically significant **increase**._",
            ),
            Verdict::Decrease => text.push_str(
                "\n_The treatment group showed a statistically significant **decrease**._",
            ),
            Verdict::Inconclusive => {}
        }
        text
    } else {
        format!(
            "The p-value (`{:.4}`) is greater than or equal to alpha (`{:.3}`).\n\
             We **fail to reject the null hypothesis**: there is no statistically significant \
             evidence that the treatment conversion rate {} the control rate.",
            test.p_value,
            test.threshold,
            describe_alternative(test.alternative)
        )
    }
}

fn narrative(
    config_control: &GroupConfig,
    config_treatment: &GroupConfig,
    stats_control: &SummaryStats,
    stats_treatment: &SummaryStats,
    test: &TestResult,
) -> String {
    let mut lines = vec!["## A/B Test Results Summary".to_string()];

    configuration_lines(
        &mut lines,
        config_control,
        config_treatment,
        stats_control,
        test,
    );

    lines.push("\n### Observed Metrics:".to_string());
    lines.push(group_line(config_control, stats_control));
    lines.push(group_line(config_treatment, stats_treatment));
    lines.push(format!(
        "  * Observed Absolute Difference: `{:.4}`",
        stats_treatment.rate - stats_control.rate
    ));
    match relative_difference(stats_control, stats_treatment) {
        Some(relative) => lines.push(format!(
            "  * Observed Relative Difference: `{:.2}%`",
            relative * 100.0
        )),
        None => lines.push(
            "  * Observed Relative Difference: `N/A (Control Conversion is 0)`".to_string(),
        ),
    }

    lines.push("\n### Statistical Test Results (Welch's t-test):".to_string());
    lines.push(format!("  * T-statistic: `{:.4}`", test.t_statistic));
    lines.push(format!(
        "  * Degrees of Freedom: `{:.2}`",
        test.degrees_of_freedom
    ));
    lines.push(format!("  * P-value: `{:.4}`", test.p_value));

    lines.push(format!("\n### Conclusion:\n{}", conclusion(test)));
    lines.join("\n")
}

/// Assemble the structured results of one analysis into a [`Report`].
///
/// Pure: the chart record and the narrative are derived only from the
/// arguments.
pub fn compose_report(
    config_control: &GroupConfig,
    config_treatment: &GroupConfig,
    stats_control: &SummaryStats,
    stats_treatment: &SummaryStats,
    test_result: &TestResult,
) -> Report {
    Report {
        control: GroupReport {
            config: config_control.clone(),
            stats: stats_control.clone(),
        },
        treatment: GroupReport {
            config: config_treatment.clone(),
            stats: stats_treatment.clone(),
        },
        test: test_result.clone(),
        chart: build_chart(
            config_control,
            config_treatment,
            stats_control,
            stats_treatment,
            test_result,
        ),
        narrative: narrative(
            config_control,
            config_treatment,
            stats_control,
            stats_treatment,
            test_result,
        ),
    }
}
