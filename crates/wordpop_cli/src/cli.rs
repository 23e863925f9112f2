use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde_json::json;
use wordpop_core::client::translation::{example_lines, DEFAULT_TARGET_LANGUAGE};
use wordpop_core::popup::session::DefinitionView;
use wordpop_core::popup::view::render_panel;
use wordpop_core::{
    hanja_chars, init_logging, parse_setting_field, AppConfig, BackgroundHost,
    ChatCompletionClient, ExportController, ExportError, HttpDictionaryClient, MessageChannel,
    MessageRouter, PopupController, PopupView, RouterRequest, SaveSettings, SettingField,
    StorageAccessor, Tab, TranslationClient, Trigger, WordStore,
};

#[derive(Parser, Debug)]
#[command(name = "wordpop", about = "Korean word lookup, saving and export", version)]
pub struct Cli {
    /// Emit JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    /// SQLite database holding saved words and settings.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Origin of the local dictionary service.
    #[arg(long, global = true)]
    dictionary_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Language the popup translates into.
    #[arg(long, global = true)]
    target_language: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the popup for selected text, as the context menu does.
    Popup(PopupArgs),
    /// Open the popup through the keyboard shortcut.
    Shortcut(PopupArgs),
    /// Fetch a dictionary definition through the message router.
    Lookup { word: String },
    /// Translate text.
    Translate {
        text: String,
        /// Target language.
        #[arg(long, default_value = DEFAULT_TARGET_LANGUAGE)]
        to: String,
    },
    /// Generate easy, medium and hard example sentences.
    Examples { word: String },
    /// List the Hanja characters of a text.
    Hanja {
        text: String,
        /// Also look up the meaning of each character.
        #[arg(long)]
        meanings: bool,
    },
    /// Save a bare word and translation.
    Save { word: String, translation: String },
    /// List saved words, or delete one.
    Words {
        /// Word to delete.
        #[arg(long)]
        delete: Option<String>,
    },
    /// Show or change save settings.
    Settings {
        /// Setting to change, e.g. `hanjaMeanings` or `part-of-speech`.
        field: Option<String>,
        /// New value (on/off, true/false).
        #[arg(value_parser = BoolishValueParser::new())]
        value: Option<bool>,
    },
    /// Export unexported words to a CSV file.
    Export {
        /// Directory receiving the file.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Show past exports.
    History,
    /// Send one raw JSON message to the router.
    Message { payload: String },
}

#[derive(clap::Args, Debug)]
struct PopupArgs {
    /// Selected text.
    text: String,
    /// Tab to show.
    #[arg(long, default_value = "definition", value_parser = parse_tab)]
    tab: Tab,
    /// Index of the word to show.
    #[arg(long, default_value_t = 0)]
    word: usize,
    /// Treat the selection as automatic (requires showAutomatically).
    #[arg(long)]
    automatic: bool,
    /// Save the shown word afterwards.
    #[arg(long)]
    save: bool,
}

fn parse_tab(value: &str) -> Result<Tab, String> {
    Tab::parse(value).ok_or_else(|| {
        let names: Vec<_> = Tab::ALL.iter().map(|tab| tab.id()).collect();
        format!("unknown tab `{value}`, expected one of {}", names.join(", "))
    })
}

/// Everything a command may need, built once per invocation.
struct App {
    config: AppConfig,
    words: WordStore,
    router: MessageRouter,
    translator: TranslationClient,
}

impl App {
    fn build(config: AppConfig) -> Result<Self, Box<dyn Error>> {
        let storage = Arc::new(StorageAccessor::open(&config.db_path)?);
        let words = WordStore::new(storage);
        let dictionary = HttpDictionaryClient::new(&config.dictionary_url, config.http_timeout)?;
        let router = MessageRouter::new(Arc::new(dictionary), words.clone());
        let chat = ChatCompletionClient::new(
            &config.chat_url,
            &config.chat_api_key,
            &config.chat_model,
            config.http_timeout,
        )?;
        Ok(Self {
            config,
            words,
            router,
            translator: TranslationClient::new(Arc::new(chat)),
        })
    }
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    if let Some(url) = cli.dictionary_url.clone() {
        config.dictionary_url = url;
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }
    if let Some(language) = cli.target_language.clone() {
        config.target_language = language;
    }
    config.validate()?;

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok command={}",
        command_name(&cli.command)
    );

    let app = App::build(config)?;
    let as_json = cli.json;
    match cli.command {
        Command::Popup(args) => handle_popup(&app, args, Trigger::ContextMenu, as_json),
        Command::Shortcut(args) => handle_popup(&app, args, Trigger::Shortcut, as_json),
        Command::Lookup { word } => handle_lookup(&app, word, as_json),
        Command::Translate { text, to } => {
            print_text(&app.translator.translate(&text, &to), as_json)
        }
        Command::Examples { word } => handle_examples(&app, word, as_json),
        Command::Hanja { text, meanings } => handle_hanja(&app, text, meanings, as_json),
        Command::Save { word, translation } => handle_save(&app, word, translation, as_json),
        Command::Words { delete } => handle_words(&app, delete, as_json),
        Command::Settings { field, value } => handle_settings(&app, field, value, as_json),
        Command::Export { out } => handle_export(&app, out, as_json),
        Command::History => handle_history(&app, as_json),
        Command::Message { payload } => {
            println!("{}", app.router.dispatch_json(&payload));
            Ok(())
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Popup(_) => "popup",
        Command::Shortcut(_) => "shortcut",
        Command::Lookup { .. } => "lookup",
        Command::Translate { .. } => "translate",
        Command::Examples { .. } => "examples",
        Command::Hanja { .. } => "hanja",
        Command::Save { .. } => "save",
        Command::Words { .. } => "words",
        Command::Settings { .. } => "settings",
        Command::Export { .. } => "export",
        Command::History => "history",
        Command::Message { .. } => "message",
    }
}

fn handle_popup(
    app: &App,
    args: PopupArgs,
    trigger: Trigger,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let trigger = if args.automatic { Trigger::Automatic } else { trigger };
    let host = BackgroundHost::spawn(app.router.clone());
    let channel: Arc<dyn MessageChannel> = Arc::new(host);
    let mut popup = PopupController::new(
        channel,
        app.translator.clone(),
        app.words.clone(),
        app.config.target_language.clone(),
    );

    if !popup.show(trigger, &args.text, None) {
        return Err("no popup opened (empty selection or automatic popups disabled)".into());
    }
    if args.word > 0 && !popup.select_word(args.word) {
        warn!("event=cli_popup module=cli status=ignored word_index={}", args.word);
    }
    if args.tab != Tab::Definition {
        popup.select_tab(args.tab);
    }
    if args.save {
        popup.save();
    }

    let view = popup.render().ok_or("popup closed unexpectedly")?;
    print_popup(&view, as_json)
}

fn print_popup(view: &PopupView, as_json: bool) -> Result<(), Box<dyn Error>> {
    let active = view
        .tabs
        .iter()
        .find(|button| button.active)
        .map(|button| button.tab.id());
    if as_json {
        let payload = json!({
            "word": view.word,
            "position": view.navigation.as_ref().map(|nav| nav.position.clone()),
            "tab": active,
            "body": view.body,
            "saveEnabled": view.save_enabled,
            "notification": view.notification.as_ref().map(|note| note.text.clone()),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    match &view.navigation {
        Some(nav) => println!(
            "{} [{}]{}{}",
            view.word,
            nav.position,
            if nav.prev_enabled { " <prev" } else { "" },
            if nav.next_enabled { " next>" } else { "" },
        ),
        None => println!("{}", view.word),
    }
    let tabs: Vec<String> = view
        .tabs
        .iter()
        .map(|button| {
            if button.active {
                format!("[{}]", button.label)
            } else {
                button.label.to_string()
            }
        })
        .collect();
    println!("{}", tabs.join(" | "));
    println!();
    for line in &view.body {
        println!("{line}");
    }
    if let Some(note) = &view.notification {
        println!();
        println!("> {}", note.text);
    }
    Ok(())
}

fn handle_lookup(app: &App, word: String, as_json: bool) -> Result<(), Box<dyn Error>> {
    let host = BackgroundHost::spawn(app.router.clone());
    let response = host
        .send(RouterRequest::GetDefinition { word: word.clone() })
        .wait();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }
    if !response.success {
        return Err(format!("Error loading definition: {}", response.error_text()).into());
    }
    let record = response.data.map(|data| data.message).unwrap_or_default();
    let view = DefinitionView::from_record(&word, &record);
    let state = wordpop_core::popup::PanelState::Ready(
        wordpop_core::popup::PanelContent::Definition(view),
    );
    for line in render_panel(&state) {
        println!("{line}");
    }
    Ok(())
}

fn handle_examples(app: &App, word: String, as_json: bool) -> Result<(), Box<dyn Error>> {
    let examples = app.translator.generate_examples(&word);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&example_lines(&examples))?);
    } else {
        for line in example_lines(&examples) {
            println!("{line}");
        }
    }
    Ok(())
}

fn handle_hanja(
    app: &App,
    text: String,
    meanings: bool,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let characters = hanja_chars(&text);
    if characters.is_empty() {
        return print_text("No valid Hanja characters found.", as_json);
    }
    if !meanings {
        let joined: Vec<String> = characters.iter().map(char::to_string).collect();
        return print_text(&joined.join(" "), as_json);
    }

    let (items, _) = app.translator.lookup_hanja_meanings(&characters);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for item in items {
            println!("{} = {}", item.character, item.meaning);
        }
    }
    Ok(())
}

fn handle_save(
    app: &App,
    word: String,
    translation: String,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let response = app.router.request(RouterRequest::SaveWord { word, translation });
    if as_json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }
    if response.success {
        println!("Saved!");
        Ok(())
    } else {
        Err(response.error_text().to_string().into())
    }
}

fn handle_words(app: &App, delete: Option<String>, as_json: bool) -> Result<(), Box<dyn Error>> {
    if let Some(word) = delete {
        if !app.words.delete(&word)? {
            return Err(format!("word not saved: {word}").into());
        }
        return print_text(&format!("Deleted {word}"), as_json);
    }

    let saved = app.words.saved_words()?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
        return Ok(());
    }
    if saved.is_empty() {
        println!("No saved words yet.");
    }
    for entry in saved {
        println!(
            "{}\t{}\tTOPIK {}{}",
            entry.word,
            entry.title,
            entry.topik,
            if entry.exported { "\t(exported)" } else { "" }
        );
    }
    Ok(())
}

fn handle_settings(
    app: &App,
    field: Option<String>,
    value: Option<bool>,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let settings = match (field, value) {
        (Some(field), Some(value)) => app.words.set_setting(parse_setting_field(&field)?, value)?,
        (Some(field), None) => {
            return Err(format!("missing value for setting `{field}`").into());
        }
        _ => app.words.settings()?,
    };
    print_settings(&settings, as_json)
}

fn print_settings(settings: &SaveSettings, as_json: bool) -> Result<(), Box<dyn Error>> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(());
    }
    for field in SettingField::ALL {
        println!(
            "[{}] {} ({})",
            if settings.get(field) { "x" } else { " " },
            field.label(),
            field.as_str()
        );
    }
    Ok(())
}

fn handle_export(app: &App, out: PathBuf, as_json: bool) -> Result<(), Box<dyn Error>> {
    let controller = ExportController::new(app.words.clone());
    let result = controller.export(|file| std::fs::write(out.join(&file.filename), &file.contents));
    match result {
        Ok(record) => {
            if as_json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("Exported {} words to {}", record.count, record.filename);
            }
            Ok(())
        }
        Err(ExportError::NothingToExport) => print_text("No new words to export.", as_json),
        Err(err) => Err(err.into()),
    }
}

fn handle_history(app: &App, as_json: bool) -> Result<(), Box<dyn Error>> {
    let history = app.words.export_history()?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }
    if history.is_empty() {
        println!("No exports yet.");
    }
    for record in history {
        println!("{}\t{}\t{} words", record.timestamp, record.filename, record.count);
    }
    Ok(())
}

fn print_text(text: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&json!({ "text": text }))?);
    } else {
        println!("{text}");
    }
    Ok(())
}
