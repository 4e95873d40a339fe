//! CLI application handler.
//!
//! Turns parsed commands into client calls and renders the results as
//! styled text or JSON. Failed mutations are reported as notices and do
//! not abort the process.
use std::{
    fs::{read_to_string, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

use console::style;
use fuzzy_matcher::{skim::SkimMatcherV2, FuzzyMatcher};
use log::{debug, info};
use shell_words::split;
use tempfile::Builder;

use crate::{
    format_date, parse_key_value, process_editor_content, CheckInArgs, CheckInDraft, Commands,
    Config, CopingCategory, CopingMechanism, Form, JournalDraft, LibraryTopic, Notice,
    NoticeLevel, Presence, Principal, RatingField, RatingsDraft, Result, SavedRef, SavedView,
    SubmissionOutcome, WellError, WellnessClient,
};

/// CLI Application handler - processes CLI commands through the wellness client
pub struct App {
    client: WellnessClient,

    /// Application configuration
    config: Config,

    /// Where `config` is persisted
    config_path: PathBuf,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    pub fn new(client: WellnessClient, config: Config, config_path: PathBuf, verbose: bool) -> Self {
        Self {
            client,
            config,
            config_path,
            verbose,
        }
    }

    /// Run the CLI application with the given command
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        let result = match command {
            Commands::Login { principal } => self.handle_login(&principal),
            Commands::Logout => self.handle_logout(),
            Commands::Profile { name } => self.handle_profile(name).await,
            Commands::Toolkit {
                category,
                search,
                limit,
                json,
            } => self.list_mechanisms(category, search, limit, json).await,
            Commands::Mechanism { id, save, json } => self.view_mechanism(id, save, json).await,
            Commands::Library { json } => self.list_topics(json),
            Commands::Topic { id, save, json } => self.view_topic(id, save, json).await,
            Commands::Save { kind, id } => {
                let target = match kind.as_str() {
                    "topic" => SavedRef::topic(id),
                    _ => SavedRef::mechanism(id),
                };
                self.save(target).await;
                Ok(())
            }
            Commands::Saved { json } => self.show_saved(json).await,
            Commands::CheckIn(args) => self.record_check_in(args).await,
            Commands::CheckIns { limit, json } => self.list_check_ins(limit, json).await,
            Commands::ShowCheckIn { id, json } => self.show_check_in(id, json).await,
            Commands::Journal {
                entry,
                prompt,
                edit,
            } => self.write_journal(entry, prompt, edit).await,
            Commands::Entries { limit, json } => self.list_entries(limit, json).await,
            Commands::Prompts => self.list_prompts().await,
            Commands::Config { show, set, reset } => self.handle_config(show, set, reset),
        };

        match result {
            Err(WellError::NotSignedIn) => {
                self.print_notice(&Notice::error(
                    "Please sign in first: wellkeep login <principal>",
                ));
                Ok(())
            }
            other => other,
        }
    }

    fn print_notice(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{}", style(&notice.message).green()),
            NoticeLevel::Info => println!("{}", style(&notice.message).cyan()),
            NoticeLevel::Error => eprintln!("{}", style(&notice.message).red()),
        }
    }

    fn separator(&self) -> String {
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);
        "-".repeat(term_width.min(50))
    }

    fn handle_login(&mut self, principal: &str) -> Result<()> {
        let principal = Principal::parse(principal)?;
        self.config.principal = Some(principal.to_string());
        self.config.save(&self.config_path)?;
        self.client.sign_in(principal.clone());
        println!("Signed in as {}", style(principal).bold());
        Ok(())
    }

    fn handle_logout(&mut self) -> Result<()> {
        self.config.principal = None;
        self.config.save(&self.config_path)?;
        self.client.sign_out()?;
        println!("Signed out");
        Ok(())
    }

    async fn handle_profile(&self, name: Option<String>) -> Result<()> {
        if let Some(name) = name {
            match self.client.save_profile(&name).await {
                Ok(()) => self.print_notice(&Notice::success("Profile saved")),
                Err(e) => self.print_notice(&Notice::for_error(&e, "Failed to save profile")),
            }
            return Ok(());
        }

        match self.client.caller_profile().await? {
            Presence::Present(profile) => println!("Name: {}", style(profile.name).bold()),
            Presence::Absent => {
                println!("No profile yet. Set your name with: wellkeep profile --name <name>")
            }
        }
        Ok(())
    }

    async fn list_mechanisms(
        &self,
        category: Option<String>,
        search: Option<String>,
        limit: usize,
        json: bool,
    ) -> Result<()> {
        let category = category
            .map(|name| name.parse::<CopingCategory>())
            .transpose()?;

        let mut mechanisms = self.client.coping_mechanisms(category).await?;
        if let Some(query) = search {
            mechanisms = self.search_mechanisms(mechanisms, &query);
        }
        if limit > 0 && mechanisms.len() > limit {
            mechanisms.truncate(limit);
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&mechanisms)?);
            return Ok(());
        }

        if mechanisms.is_empty() {
            println!("No coping strategies found.");
            return Ok(());
        }

        for (i, mechanism) in mechanisms.iter().enumerate() {
            if i > 0 {
                println!("{}", self.separator());
            }
            self.print_mechanism_summary(mechanism);
        }
        println!(
            "\n{} strateg{}",
            mechanisms.len(),
            if mechanisms.len() == 1 { "y" } else { "ies" }
        );
        Ok(())
    }

    /// Fuzzy match on title and description, title weighted higher, best first
    fn search_mechanisms(&self, mechanisms: Vec<CopingMechanism>, query: &str) -> Vec<CopingMechanism> {
        let matcher = SkimMatcherV2::default();

        let mut scored: Vec<(i64, CopingMechanism)> = mechanisms
            .into_iter()
            .filter_map(|mechanism| {
                let title_score = matcher.fuzzy_match(&mechanism.title, query).unwrap_or(0);
                let description_score = matcher
                    .fuzzy_match(&mechanism.description, query)
                    .unwrap_or(0);
                let score = title_score * 2 + description_score;
                (score > 0).then_some((score, mechanism))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        debug!("Search '{}' matched {} strategies", query, scored.len());
        scored.into_iter().map(|(_, mechanism)| mechanism).collect()
    }

    fn print_mechanism_summary(&self, mechanism: &CopingMechanism) {
        println!(
            "[{}] {} {}",
            mechanism.id,
            style(&mechanism.title).bold(),
            style(format!("({})", mechanism.category)).dim()
        );
        println!("{}", mechanism.description);

        let mut badges = Vec::new();
        if mechanism.has_evidence {
            badges.push("Evidence-based");
        }
        if mechanism.is_holistic {
            badges.push("Holistic");
        }
        if !badges.is_empty() {
            println!("{}", style(badges.join(" | ")).cyan());
        }
    }

    async fn view_mechanism(&self, id: u64, save: bool, json: bool) -> Result<()> {
        let mechanism = self.client.coping_mechanism(id).await?;

        if json {
            println!("{}", serde_json::to_string_pretty(&mechanism)?);
        } else {
            self.print_mechanism_summary(&mechanism);
            if !mechanism.notes.is_empty() {
                println!("\n{}\n{}", style("How to use it").underlined(), mechanism.notes);
            }
            self.print_saved_status(SavedRef::mechanism(id)).await?;
        }

        if save {
            self.save(SavedRef::mechanism(id)).await;
        }
        Ok(())
    }

    fn list_topics(&self, json: bool) -> Result<()> {
        let topics = crate::library_topics();
        if json {
            println!("{}", serde_json::to_string_pretty(topics)?);
            return Ok(());
        }

        for topic in topics {
            println!("[{}] {}", topic.id, style(topic.title).bold());
            println!("    {}", topic.description);
        }
        Ok(())
    }

    fn print_topic(&self, topic: &LibraryTopic) {
        println!("{}", style(topic.title).bold());
        println!("{}", topic.description);
        for section in topic.sections {
            println!("\n{}", style(section.heading).underlined());
            for point in section.points {
                println!("  - {}", point);
            }
        }
    }

    async fn view_topic(&self, id: u64, save: bool, json: bool) -> Result<()> {
        let topic = self.client.topic(id)?;

        if json {
            println!("{}", serde_json::to_string_pretty(topic)?);
        } else {
            self.print_topic(topic);
            self.print_saved_status(SavedRef::topic(id)).await?;
        }

        if save {
            self.save(SavedRef::topic(id)).await;
        }
        Ok(())
    }

    async fn print_saved_status(&self, target: SavedRef) -> Result<()> {
        if !self.client.is_signed_in() {
            return Ok(());
        }
        if self.client.is_saved(target).await? {
            println!("\n{}", style("Saved").green());
        }
        Ok(())
    }

    async fn save(&self, target: SavedRef) {
        let notice = match self.client.save_item(target).await {
            Ok(outcome) => Notice::for_save(outcome, target.kind),
            Err(e) => Notice::for_save_error(&e, target.kind),
        };
        self.print_notice(&notice);
    }

    async fn show_saved(&self, json: bool) -> Result<()> {
        let view = self.client.saved_view().await?;

        if json {
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }

        match view {
            SavedView::Nothing => {
                println!("Nothing saved yet.");
                println!("Browse the toolkit and library to bookmark items you want to revisit.");
            }
            SavedView::Items { mechanisms, topics } => {
                if !mechanisms.is_empty() {
                    println!("{}", style("Coping Strategies").bold().underlined());
                    for mechanism in &mechanisms {
                        println!("[{}] {}", mechanism.id, style(&mechanism.title).bold());
                        println!("    {}", mechanism.description);
                    }
                }
                if !topics.is_empty() {
                    if !mechanisms.is_empty() {
                        println!();
                    }
                    println!("{}", style("Library Topics").bold().underlined());
                    for topic in &topics {
                        println!("[{}] {}", topic.id, style(topic.title).bold());
                        println!("    {}", topic.description);
                    }
                }
            }
        }
        Ok(())
    }

    async fn record_check_in(&self, args: CheckInArgs) -> Result<()> {
        let form = Form::new(CheckInDraft {
            ratings: RatingsDraft {
                focus: args.focus,
                mood: args.mood,
                energy: args.energy,
                sleep_quality: args.sleep,
                hot_flash_severity: args.hot_flashes,
                anxiety: args.anxiety,
                irritability: args.irritability,
            },
            notes: args.notes.unwrap_or_default(),
        });

        self.report_submission(form.submit(&self.client).await?)
    }

    fn report_submission(&self, outcome: SubmissionOutcome) -> Result<()> {
        match outcome {
            SubmissionOutcome::Saved(notice) => self.print_notice(&notice),
            SubmissionOutcome::Failed { notice, error } => {
                if let WellError::NotSignedIn = error {
                    return Err(error);
                }
                if self.verbose {
                    debug!("Submission error: {}", error);
                }
                self.print_notice(&notice);
            }
            SubmissionOutcome::Discarded => debug!("Submission discarded"),
        }
        Ok(())
    }

    async fn list_check_ins(&self, limit: usize, json: bool) -> Result<()> {
        let mut check_ins = self.client.check_ins().await?;
        if limit > 0 && check_ins.len() > limit {
            check_ins.truncate(limit);
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&check_ins)?);
            return Ok(());
        }

        if check_ins.is_empty() {
            println!("No check-ins yet. Record one with: wellkeep check-in");
            return Ok(());
        }

        for (i, check_in) in check_ins.iter().enumerate() {
            if i > 0 {
                println!("{}", self.separator());
            }
            println!(
                "[{}] {}",
                check_in.id,
                style(format_date(check_in.date)).bold()
            );
            let scores = RatingField::ALL
                .iter()
                .map(|field| format!("{}: {}", field.label(), check_in.ratings.get(*field).value()))
                .collect::<Vec<_>>()
                .join(" | ");
            println!("{}", scores);
            if let Presence::Present(notes) = &check_in.notes {
                println!("{}", style(notes).italic());
            }
        }
        Ok(())
    }

    async fn show_check_in(&self, id: u64, json: bool) -> Result<()> {
        let check_in = match self.client.check_in(id).await {
            Ok(check_in) => check_in,
            Err(WellError::NotFound { .. }) => {
                self.print_notice(&Notice::error("Check-in not found."));
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&check_in)?);
            return Ok(());
        }

        println!("{}", style(format_date(check_in.date)).bold());
        for field in RatingField::ALL {
            println!(
                "  {:<20} {:>2}/10",
                field.label(),
                check_in.ratings.get(field).value()
            );
        }
        if let Presence::Present(notes) = &check_in.notes {
            println!("\n{}\n{}", style("Notes").underlined(), notes);
        }
        Ok(())
    }

    async fn write_journal(
        &self,
        entry: Option<String>,
        prompt: Option<usize>,
        edit: bool,
    ) -> Result<()> {
        let prompt = match prompt {
            Some(number) => {
                let prompts = self.client.prompts().await?;
                let text = number
                    .checked_sub(1)
                    .and_then(|index| prompts.get(index))
                    .ok_or_else(|| WellError::ApplicationError {
                        message: format!(
                            "No prompt number {}; see `wellkeep prompts`",
                            number
                        ),
                    })?;
                Presence::Present(text.clone())
            }
            None => Presence::Absent,
        };

        let entry = match (entry, edit) {
            (Some(text), false) => text,
            (Some(text), true) => self.open_editor(&prompt, &text)?,
            (None, _) => self.open_editor(&prompt, "")?,
        };

        let form = Form::new(JournalDraft { prompt, entry });
        self.report_submission(form.submit(&self.client).await?)
    }

    fn open_editor(&self, prompt: &Presence<String>, existing: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        self.write_editor_template(&temp_path, prompt, existing)?;

        info!("Opening editor for the journal entry. Save and exit when done...");
        self.launch_editor(&self.config.get_editor_command(), &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(process_editor_content(&content))
    }

    fn write_editor_template(
        &self,
        path: &Path,
        prompt: &Presence<String>,
        existing: &str,
    ) -> Result<()> {
        let mut file = OpenOptions::new().write(true).open(path)?;

        writeln!(file, "<!-- Write your journal entry below. -->")?;
        if let Presence::Present(prompt) = prompt {
            writeln!(file, "<!-- Prompt: {} -->", prompt)?;
        }
        writeln!(file, "<!-- Lines wrapped in comment markers are ignored. -->")?;
        writeln!(file)?;
        if !existing.is_empty() {
            writeln!(file, "{}", existing)?;
        }
        Ok(())
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let args = split(editor_cmd).map_err(|e| WellError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let Some((program, rest)) = args.split_first() else {
            return Err(WellError::EditorError {
                message: "Empty editor command".to_string(),
            });
        };

        let status = Command::new(program)
            .args(rest)
            .arg(file_path.to_string_lossy().as_ref())
            .status()?;

        if !status.success() {
            return Err(WellError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }
        Ok(())
    }

    async fn list_entries(&self, limit: usize, json: bool) -> Result<()> {
        let mut entries = self.client.journal_entries().await?;
        if limit > 0 && entries.len() > limit {
            entries.truncate(limit);
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        if entries.is_empty() {
            println!("No journal entries yet. Write one with: wellkeep journal");
            return Ok(());
        }

        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                println!("{}", self.separator());
            }
            println!("{}", style(format_date(entry.date)).bold());
            if let Presence::Present(prompt) = &entry.prompt {
                println!("{}", style(prompt).italic().cyan());
            }
            println!("{}", entry.entry);
        }
        Ok(())
    }

    async fn list_prompts(&self) -> Result<()> {
        let prompts = self.client.prompts().await?;
        for (i, prompt) in prompts.iter().enumerate() {
            println!("{:>2}. {}", i + 1, prompt);
        }
        Ok(())
    }

    fn handle_config(&mut self, show: bool, set: Option<String>, reset: bool) -> Result<()> {
        let show = show || (set.is_none() && !reset);

        if reset {
            self.config = Config::default();
            self.config.save(&self.config_path)?;
            println!("Configuration reset to defaults");
        }

        if let Some(setting) = set {
            let (key, value) = parse_key_value(&setting)?;
            self.config.set(&key, &value)?;
            self.config.save(&self.config_path)?;
            println!("Set {} = {}", key, value);
        }

        if show {
            println!("Config file: {}", self.config_path.display());
            println!("{}", serde_json::to_string_pretty(&self.config)?);
        }
        Ok(())
    }
}
