// CLI commands for running and submitting solutions
use anyhow::{bail, Context, Result};
use neetcode_common::client::{HistoryQuery, ProblemQuery};
use neetcode_common::driver::{compose, driver};
use neetcode_common::render::{OutputView, StatusGlyph, SubmissionView};
use neetcode_common::session::{Notice, SessionState};
use neetcode_common::templates::{switch_language, template, INPUT_HELP};
use neetcode_common::types::{Language, Submission, SubmissionKind, TestCase};
use neetcode_common::{AppContext, ProblemBackend, RunRequest, SubmissionBackend, SubmitRequest};
use std::fs;
use std::path::Path;
use tokio::sync::watch;
use tracing::{debug, warn};

fn parse_language(tag: &str) -> Result<Language> {
    match Language::from_str(tag) {
        Some(language) => Ok(language),
        None => bail!("Language not supported: {}", tag),
    }
}

/// Guess the language from a solution file's extension
fn language_from_path(path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "py" => Some(Language::Python),
        "js" | "mjs" => Some(Language::JavaScript),
        "ts" => Some(Language::TypeScript),
        "java" => Some(Language::Java),
        "cpp" | "cc" | "cxx" => Some(Language::Cpp),
        "c" => Some(Language::C),
        _ => None,
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// 1-based numbers of the first and last rows on a page
fn page_range(offset: u32, count: usize) -> (u64, u64) {
    let offset = u64::from(offset);
    (offset + 1, offset + count as u64)
}

/// Follow-up line printed under a verdict, if any
fn verdict_hint(view: &OutputView, submission_id: &str) -> Option<String> {
    match view {
        OutputView::Submission(v) if v.is_accepted() => None,
        OutputView::Submission(v) if v.still_judging => Some(format!(
            "💡 Check back later with: neetcode status --id {}",
            submission_id
        )),
        OutputView::Submission(_) => Some(format!(
            "📋 Review it with: neetcode status --id {}",
            submission_id
        )),
        _ => None,
    }
}

fn print_notice(state: &SessionState) {
    match &state.notice {
        Some(Notice::Success(msg)) => println!("✅ {}", msg),
        Some(Notice::Info(msg)) => println!("💡 {}", msg),
        Some(Notice::Error(msg)) => println!("❌ {}", msg),
        None => {}
    }
}

/// Show the input help once per state dir, for languages run through the hidden wrapper
fn maybe_show_tutorial(ctx: &AppContext, language: Language) {
    if driver(language).is_none() || !ctx.tutorial_pending() {
        return;
    }
    println!("📘 {}\n", INPUT_HELP);
    if let Err(e) = ctx.mark_tutorial_seen() {
        warn!(error = %e, "Could not persist tutorial marker");
    }
}

pub fn list_languages() -> Result<()> {
    println!("📋 Supported Languages:\n");
    println!("{:<12} {:<12} {:<10} {:<10} {:<10}", "TAG", "NAME", "JUDGE ID", "DRIVER", "TEMPLATE");
    println!("{}", "─".repeat(58));

    for language in Language::ALL {
        println!(
            "{:<12} {:<12} {:<10} {:<10} {:<10}",
            language.tag(),
            language.display_name(),
            language.judge_id(),
            if driver(language).is_some() { "yes" } else { "-" },
            if template(language).is_some() { "yes" } else { "-" },
        );
    }

    println!("\n✅ Total: {} language(s)", Language::ALL.len());
    Ok(())
}

pub fn print_template(tag: &str, current: Option<&Path>) -> Result<()> {
    let language = parse_language(tag)?;
    if let Some(path) = current {
        let code = read_source(path)?;
        print!("{}", switch_language(&code, language));
        return Ok(());
    }

    match template(language) {
        Some(code) => {
            println!("{}", code);
            Ok(())
        }
        None => bail!("No starter template for {}", language.display_name()),
    }
}

pub fn compose_file(tag: &str, file: &Path) -> Result<()> {
    let language = parse_language(tag)?;
    let code = read_source(file)?;
    print!("{}", compose(&code, language));
    Ok(())
}

pub async fn show_problem(ctx: &AppContext, problem_id: &str) -> Result<()> {
    let detail = ctx
        .api()
        .get_problem(problem_id)
        .await
        .with_context(|| format!("Failed to load problem {}", problem_id))?;
    let problem = &detail.problem;

    println!("📖 {}", problem.title);
    if let Some(difficulty) = &problem.difficulty {
        println!("   Difficulty: {}", difficulty);
    }
    if !problem.tags.is_empty() {
        println!("   Tags: {}", problem.tags.join(", "));
    }
    println!("   Limits: {} ms, {} MB", problem.time_limit, problem.memory_limit);
    println!("   Languages: {}", problem.languages.join(", "));
    println!("\n{}", problem.description);

    for (i, case) in detail.sample_test_cases.iter().enumerate() {
        println!("\n🧪 Sample {}", i + 1);
        println!("Input:\n{}", case.input);
        println!("Expected:\n{}", case.expected_output);
    }
    Ok(())
}

pub async fn run_code(
    ctx: &AppContext,
    file: &Path,
    language: Option<&str>,
    problem_id: Option<&str>,
    input: Option<&str>,
    input_file: Option<&Path>,
) -> Result<()> {
    let code = read_source(file)?;

    let mut sample_tests: Vec<TestCase> = Vec::new();
    let mut problem_language = None;
    if let Some(id) = problem_id {
        let detail = ctx
            .api()
            .get_problem(id)
            .await
            .with_context(|| format!("Failed to load problem {}", id))?;
        problem_language = detail.problem.default_language();
        sample_tests = detail.sample_test_cases;
    }

    let language = match language {
        Some(tag) => tag.to_string(),
        None => problem_language
            .or_else(|| language_from_path(file))
            .map(|l| l.tag().to_string())
            .context("Cannot infer the language, pass --language")?,
    };

    let custom_input = match input_file {
        Some(path) => Some(read_source(path)?),
        None => input.map(str::to_string),
    };

    if let Some(parsed) = Language::from_str(&language) {
        maybe_show_tutorial(ctx, parsed);
    }

    let mut session = ctx.session();
    let request = RunRequest {
        code,
        language,
        custom_input,
        sample_tests,
    };

    println!("🚀 Running {}...", file.display());
    session.run(request).await.context("Run failed")?;
    let state = session.settled().await;

    debug!(generation = state.generation, "Run finished");
    println!("{}", OutputView::from_state(&state));
    Ok(())
}

pub async fn submit_code(
    ctx: &AppContext,
    file: &Path,
    problem_id: &str,
    language: Option<&str>,
) -> Result<()> {
    let code = read_source(file)?;

    let language = match language {
        Some(tag) => tag.to_string(),
        None => {
            let detail = ctx
                .api()
                .get_problem(problem_id)
                .await
                .with_context(|| format!("Failed to load problem {}", problem_id))?;
            detail
                .problem
                .default_language()
                .or_else(|| language_from_path(file))
                .map(|l| l.tag().to_string())
                .context("Cannot infer the language, pass --language")?
        }
    };

    if let Some(parsed) = Language::from_str(&language) {
        maybe_show_tutorial(ctx, parsed);
    }

    let mut session = ctx.session();
    let rx = session.subscribe();
    let request = SubmitRequest {
        problem_id: problem_id.to_string(),
        code,
        language,
    };

    let created = session.submit(request).await.context("Submit failed")?;
    println!("📨 Submission {}", created.id);

    debug!(
        interval_ms = ctx.config().poll.submit_interval_ms,
        max_polls = ctx.config().poll.submit_max_attempts,
        "Following submission"
    );

    tokio::select! {
        state = follow(rx) => {
            let view = OutputView::from_state(&state);
            println!("\n{}", view);
            print_notice(&state);
            if let Some(hint) = verdict_hint(&view, &created.id) {
                println!("{}", hint);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            session.clear();
            println!("\n⚠️  Stopped following. Check later with: neetcode status --id {}", created.id);
        }
    }
    Ok(())
}

/// Print each new in-progress label until the session goes idle
async fn follow(mut rx: watch::Receiver<SessionState>) -> SessionState {
    let mut last_label: Option<String> = None;
    loop {
        let state = rx.borrow_and_update().clone();
        if let OutputView::Submission(view) = OutputView::from_state(&state) {
            if view.glyph == StatusGlyph::Spinner && last_label.as_deref() != Some(view.label.as_str()) {
                println!("{} {}", view.glyph.symbol(), view.label);
                last_label = Some(view.label);
            }
        }
        if !state.phase.is_busy() || rx.changed().await.is_err() {
            return state;
        }
    }
}

fn print_submission_details(submission: &Submission) {
    if let Some(language) = &submission.language {
        println!("  Language: {}", language);
    }
    if let Some(time) = submission.execution_time {
        println!("  Time: {} ms", time);
    }
    if let Some(memory) = submission.memory_used {
        println!("  Memory: {} KB", memory);
    }
    if let Some(created) = submission.created_at {
        println!("  Submitted: {}", created.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}

pub async fn show_submission(ctx: &AppContext, submission_id: &str) -> Result<()> {
    let submission = ctx
        .api()
        .get_submission(submission_id)
        .await
        .with_context(|| format!("Failed to load submission {}", submission_id))?;

    println!("{}", SubmissionView::new(&submission, false));
    print_submission_details(&submission);
    Ok(())
}

pub async fn show_history(
    ctx: &AppContext,
    kind: Option<SubmissionKind>,
    limit: u32,
    offset: u32,
) -> Result<()> {
    let page = ctx
        .api()
        .my_submissions(&HistoryQuery {
            kind,
            limit: Some(limit),
            offset: Some(offset),
        })
        .await
        .context("Failed to load submission history")?;

    if page.submissions.is_empty() {
        println!("No submissions yet.");
        println!("\n💡 Submit a solution with: neetcode submit --file <file> --problem <id>");
        return Ok(());
    }

    println!("📋 Submissions:\n");
    println!("{:<26} {:<24} {:<12} {:<8} {:<20}", "ID", "STATUS", "LANGUAGE", "CASES", "SUBMITTED");
    println!("{}", "─".repeat(92));

    for submission in &page.submissions {
        let view = SubmissionView::new(submission, false);
        println!(
            "{:<26} {:<24} {:<12} {:<8} {:<20}",
            submission.id,
            format!("{} {}", view.glyph.symbol(), view.label),
            submission.language.as_deref().unwrap_or("-"),
            view.cases.as_deref().unwrap_or("-"),
            submission
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    let (first, last) = page_range(offset, page.submissions.len());
    println!("\n✅ Showing {}-{} of {}", first, last, page.pagination.total);
    Ok(())
}

pub async fn list_problems(ctx: &AppContext, query: ProblemQuery) -> Result<()> {
    let offset = query.offset.unwrap_or(0);
    let page = ctx
        .api()
        .list_problems(&query)
        .await
        .context("Failed to load problems")?;

    if page.problems.is_empty() {
        println!("No problems match these filters.");
        return Ok(());
    }

    println!("📚 Problems:\n");
    println!("{:<26} {:<32} {:<10} {:<10} {:<24}", "ID", "TITLE", "TYPE", "DIFFICULTY", "LANGUAGES");
    println!("{}", "─".repeat(106));

    for problem in &page.problems {
        println!(
            "{:<26} {:<32} {:<10} {:<10} {:<24}",
            problem.id,
            problem.title,
            problem.kind.as_deref().unwrap_or("-"),
            problem.difficulty.as_deref().unwrap_or("-"),
            problem.languages.join(","),
        );
    }

    let (first, last) = page_range(offset, page.problems.len());
    println!("\n✅ Showing {}-{} of {}", first, last, page.pagination.total);
    println!("💡 Open one with: neetcode problem --id <id>");
    Ok(())
}
