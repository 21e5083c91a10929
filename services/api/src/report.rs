use crate::infra::FixtureGateway;
use clap::Args;
use review_insights::config::{AppConfig, DashboardConfig};
use review_insights::error::AppError;
use review_insights::evaluation::domain::{ReviewId, RunId, SourceId};
use review_insights::evaluation::navigation::{fetch_run, Breadcrumb, DrilldownController};
use review_insights::evaluation::report::views::{InterviewDetailView, RunSummaryView};
use review_insights::evaluation::report::write_interview_rows_csv;
use review_insights::evaluation::{NavAction, ReviewGateway, RunReport};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct SummaryArgs {
    /// Review fixture to read (defaults to REVIEW_FIXTURE_PATH)
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
    /// Business that owns the assessment
    #[arg(long)]
    pub(crate) business: String,
    /// Assessment (review) the run belongs to
    #[arg(long)]
    pub(crate) assessment: String,
    /// Evaluation run to summarise
    #[arg(long)]
    pub(crate) run: String,
    /// Drill further into one interview of the run
    #[arg(long)]
    pub(crate) interview: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Review fixture to read (defaults to REVIEW_FIXTURE_PATH)
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
    /// Evaluation run to export
    #[arg(long)]
    pub(crate) run: String,
    /// Destination CSV file (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

fn load_gateway(fixture: Option<PathBuf>) -> Result<Arc<FixtureGateway>, AppError> {
    let config = AppConfig::load()?;
    let dashboard = DashboardConfig {
        fixture_path: fixture.or(config.dashboard.fixture_path),
    };
    Ok(Arc::new(FixtureGateway::from_config(&dashboard)?))
}

/// Walks businesses, assessments and runs the way the dashboard does, ending on the run summary.
pub(crate) async fn walk_to_run<G>(
    controller: &mut DrilldownController<G>,
    business_id: &str,
    assessment_id: &str,
    run_id: &str,
) -> Result<(), AppError>
where
    G: ReviewGateway,
{
    controller.start().await?;

    let business = controller
        .data()
        .businesses
        .iter()
        .find(|business| business.id.as_str() == business_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound {
            kind: "business",
            id: business_id.to_string(),
        })?;
    controller
        .dispatch(NavAction::SelectBusiness(business))
        .await?;

    let assessment = controller
        .data()
        .reviews
        .find(&ReviewId::new(assessment_id))
        .cloned()
        .ok_or_else(|| AppError::NotFound {
            kind: "assessment",
            id: assessment_id.to_string(),
        })?;
    controller
        .dispatch(NavAction::SelectAssessment(assessment))
        .await?;

    let run = controller
        .data()
        .runs
        .iter()
        .find(|run| run.id.as_str() == run_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound {
            kind: "run",
            id: run_id.to_string(),
        })?;
    controller.dispatch(NavAction::SelectRun(run)).await?;
    Ok(())
}

pub(crate) async fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let SummaryArgs {
        fixture,
        business,
        assessment,
        run,
        interview,
    } = args;

    let gateway = load_gateway(fixture)?;
    let mut controller = DrilldownController::new(gateway);
    walk_to_run(&mut controller, &business, &assessment, &run).await?;

    let summary = controller
        .run_report()
        .map(|report| report.summary())
        .ok_or_else(|| AppError::NotFound {
            kind: "run",
            id: run.clone(),
        })?;
    let breadcrumbs = controller.state().breadcrumbs();

    let interview = match interview {
        Some(source_id) => {
            let source_id = SourceId::new(source_id);
            controller.dispatch(NavAction::GoToBreakdown).await?;
            controller
                .dispatch(NavAction::GoToInterview(source_id.clone()))
                .await?;
            controller
                .run_report()
                .map(|report| report.interview(&source_id))
        }
        None => None,
    };

    let mut out = io::stdout().lock();
    render_summary(&mut out, &breadcrumbs, &summary)?;
    if let Some(view) = interview {
        render_interview(&mut out, &view)?;
    }
    Ok(())
}

pub(crate) async fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        fixture,
        run,
        output,
    } = args;

    let gateway = load_gateway(fixture)?;
    let (detail, scores) = fetch_run(gateway.as_ref(), &RunId::new(run)).await?;
    let breakdown = RunReport::new(&detail, &scores).breakdown();

    match output {
        Some(path) => write_interview_rows_csv(&breakdown.interviews, File::create(path)?)?,
        None => write_interview_rows_csv(&breakdown.interviews, io::stdout().lock())?,
    }
    Ok(())
}

pub(crate) fn render_summary<W: Write>(
    out: &mut W,
    breadcrumbs: &[Breadcrumb],
    summary: &RunSummaryView,
) -> io::Result<()> {
    let trail: Vec<&str> = breadcrumbs.iter().map(|crumb| crumb.label.as_str()).collect();
    writeln!(out, "{}", trail.join(" > "))?;
    writeln!(
        out,
        "Run #{} ({}) evaluated {}",
        summary.run_number, summary.run_status_label, summary.evaluated_at
    )?;
    writeln!(
        out,
        "Overall {:.1} | {} | confidence {}",
        summary.overall_score, summary.status_label, summary.confidence_label
    )?;
    writeln!(
        out,
        "{} interviews | {} unresolved of {} flags",
        summary.interview_count,
        summary.flag_counts.unresolved,
        summary.flag_counts.total()
    )?;
    for metric in &summary.metrics {
        writeln!(
            out,
            "  - {}: {:.1} ({})",
            metric.display_name, metric.score, metric.tier_label
        )?;
    }
    Ok(())
}

pub(crate) fn render_interview<W: Write>(
    out: &mut W,
    interview: &InterviewDetailView,
) -> io::Result<()> {
    writeln!(
        out,
        "\nInterview {} ({}) average {:.1}",
        interview.source_name, interview.source_id, interview.average_score
    )?;
    for question in &interview.questions {
        writeln!(
            out,
            "  - {}: {:.1} | {}/{} checks passed",
            question.question_code, question.score, question.checks_passed, question.checks_total
        )?;
    }
    for flag in &interview.flags {
        let state = if flag.is_resolved { "resolved" } else { "open" };
        writeln!(out, "  ! [{}] {} ({})", flag.severity_label, flag.title, state)?;
    }
    Ok(())
}
