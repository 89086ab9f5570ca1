use checklist_common::{
    group_by_category, HeaderField, ItemStatus, Role, Snapshot, User, CHECKLIST_ITEMS,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use vtr_checklist::analyzer::debounce::QuickDiagnosisDebouncer;
use vtr_checklist::analyzer::gemini::GeminiClient;
use vtr_checklist::analyzer::{submit_analysis, DiagnosisService, ImageAttachment};
use vtr_checklist::app::ChecklistApp;
use vtr_checklist::cli::{Cli, Commands, HistoryAction, UserAction};
use vtr_checklist::config::Config;
use vtr_checklist::confirm::{Confirm, FixedAnswer, TerminalConfirm};
use vtr_checklist::error::{ChecklistError, Result};
use vtr_checklist::export::{export_report, pdf::ImageQuality};
use vtr_checklist::storage::FileStore;
use vtr_checklist::users::UserDirectory;

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "vtr_checklist=debug,checklist_common=debug"
    } else {
        "vtr_checklist=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("⚠ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => config.data_dir()?,
    };
    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(FixedAnswer(true))
    } else {
        Box::new(TerminalConfirm)
    };
    let quality = ImageQuality {
        max_width: config.pdf_image_max_width,
        jpeg_quality: config.pdf_jpeg_quality,
    };

    match cli.command {
        Commands::Show => {
            let app = open_app(&data_dir)?;
            print_snapshot(app.session());
        }

        Commands::Status { item, status } => {
            let mut app = open_app(&data_dir)?;
            app.set_status(item, status)?;
            match app.session().item_states().status(item) {
                Some(current) => println!("✔ Item {}: {}", item, current.label()),
                None => println!("✔ Item {}: desmarcado", item),
            }
            println!("  Progresso: {}%", app.session().completion_percentage());
        }

        Commands::Describe { item, text } => {
            let mut app = open_app(&data_dir)?;
            if app.set_description(item, &text)? {
                println!("✔ Descrição do item {} atualizada", item);
            } else {
                println!("⚠ Descrição só pode ser editada em itens marcados como Defeito");
            }
        }

        Commands::Image { item, path, remove } => {
            let mut app = open_app(&data_dir)?;
            let changed = match (path, remove) {
                (_, true) => app.set_image(item, None)?,
                (Some(path), false) => app.attach_image_file(item, &path)?,
                (None, false) => false,
            };
            println!("{}", image_outcome_message(item, changed, remove));
        }

        Commands::Header { condutor, date, turno, vtr } => {
            let mut app = open_app(&data_dir)?;
            let fields = [
                (HeaderField::Condutor, condutor),
                (HeaderField::Date, date),
                (HeaderField::Turno, turno),
                (HeaderField::Vtr, vtr),
            ];
            for (field, value) in fields {
                if let Some(value) = value {
                    app.set_header(field, &value)?;
                }
            }
            print_header(app.session());
        }

        Commands::Clear => {
            let mut app = open_app(&data_dir)?;
            if app.clear_form(confirm.as_ref())? {
                println!("✔ Checklist limpo");
            } else {
                println!("Cancelado");
            }
        }

        Commands::Commit => {
            let mut app = open_app(&data_dir)?;
            let outcome = app.commit_to_history(confirm.as_ref())?;
            println!(
                "✔ Checklist salvo no histórico (id {}, {} defeito(s))",
                outcome.record_id, outcome.defects_count
            );
            if outcome.reset {
                println!("✔ Formulário limpo para uma nova vistoria");
            }
        }

        Commands::History { action } => {
            let mut app = open_app(&data_dir)?;
            match action {
                HistoryAction::List => {
                    if app.history().is_empty() {
                        println!("Nenhum checklist salvo no histórico.");
                    }
                    for record in app.history().iter() {
                        println!(
                            "{}  {}  VTR {}  {}  {}  {}% · {} defeito(s)",
                            record.id,
                            record.saved_at.with_timezone(&chrono::Local).format("%d/%m/%Y %H:%M"),
                            record.header.vtr,
                            record.header.condutor,
                            record.header.turno,
                            record.completion_percentage(),
                            record.defects_count,
                        );
                    }
                }
                HistoryAction::Show { id } => {
                    let record = app.history_record(&id)?;
                    print_snapshot(record);
                }
                HistoryAction::Delete { id } => {
                    if app.delete_history_record(&id, confirm.as_ref())? {
                        println!("✔ Registro {} excluído", id);
                    } else {
                        println!("Nada excluído");
                    }
                }
            }
        }

        Commands::Report { history, output } => {
            let app = open_app(&data_dir)?;
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            println!("📄 Gerando relatório PDF...");
            let path = match history {
                Some(id) => export_report(app.history_record(&id)?, &output, &quality)?,
                None => export_report(app.session(), &output, &quality)?,
            };
            println!("✔ Relatório salvo: {}", path.display());
        }

        Commands::Analyze { description, image } => {
            let client = GeminiClient::new(&config)?;
            let attachment = image.as_deref().map(ImageAttachment::from_path).transpose()?;
            run_full_analysis(&client, description.trim(), attachment.as_ref()).await?;
        }

        Commands::Assist { image } => {
            let service: Arc<dyn DiagnosisService> = Arc::new(GeminiClient::new(&config)?);
            let attachment = image.as_deref().map(ImageAttachment::from_path).transpose()?;
            run_assist(service, attachment, Duration::from_millis(config.debounce_ms)).await?;
        }

        Commands::Users { action } => {
            let mut directory = UserDirectory::open(FileStore::new(&data_dir));
            if directory.ensure_default_admin()? {
                println!("✔ Administrador padrão criado (admin@vtr.local)");
            }
            match action {
                UserAction::List => {
                    for user in directory.users() {
                        println!("{}  {}  {}  {}", user.cpf, user.name, user.email, user.role.label());
                    }
                }
                UserAction::Add { name, email, cpf, role } => {
                    directory.add(User {
                        name,
                        email,
                        cpf: cpf.clone(),
                        role: Role::parse_lenient(&role),
                    })?;
                    println!("✔ Usuário {} cadastrado", cpf);
                }
                UserAction::Remove { cpf } => {
                    if directory.remove(&cpf, confirm.as_ref())? {
                        println!("✔ Usuário {} removido", cpf);
                    } else {
                        println!("Nada removido");
                    }
                }
                UserAction::Import { file } => {
                    let count = directory.import_spreadsheet(&file)?;
                    println!("✔ {} usuário(s) importado(s)", count);
                }
                UserAction::Login { email, cpf } => match directory.login(&email, &cpf)? {
                    Some(user) => println!("✔ Bem-vindo, {} ({})", user.name, user.role.label()),
                    None => {
                        return Err(ChecklistError::Validation(
                            "E-mail ou CPF inválidos.".into(),
                        ))
                    }
                },
            }
        }

        Commands::Config { set_api_key, show } => {
            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ Chave da API salva em {}", Config::config_path()?.display());
            }
            if show {
                println!("Arquivo: {}", Config::config_path()?.display());
                println!("Modelo: {}", config.model);
                println!("Dados: {}", data_dir.display());
                println!(
                    "Chave da API: {}",
                    if config.api_key().is_some() { "configurada" } else { "não configurada" }
                );
                println!("Debounce: {} ms", config.debounce_ms);
                println!("Timeout: {} s", config.timeout_seconds);
            }
        }
    }

    Ok(())
}

fn image_outcome_message(item: u32, changed: bool, remove: bool) -> String {
    match (changed, remove) {
        (true, true) => format!("✔ Imagem do item {} removida", item),
        (true, false) => format!("✔ Imagem do item {} anexada", item),
        (false, true) => format!("⚠ Item {} não tem imagem para remover", item),
        (false, false) => format!("⚠ Marque o item {} antes de anexar uma imagem", item),
    }
}

fn open_app(data_dir: &Path) -> Result<ChecklistApp<FileStore>> {
    std::fs::create_dir_all(data_dir)?;
    Ok(ChecklistApp::open(FileStore::new(data_dir)))
}

fn print_header<S: Snapshot + ?Sized>(snapshot: &S) {
    let header = snapshot.header();
    println!("Condutor: {}", header.condutor);
    println!("Data:     {}", header.date);
    println!("Turno:    {}", header.turno);
    println!("VTR:      {}", header.vtr);
}

fn print_snapshot<S: Snapshot + ?Sized>(snapshot: &S) {
    print_header(snapshot);
    println!("Progresso: {}%\n", snapshot.completion_percentage());

    let states = snapshot.item_states();
    for (category, items) in group_by_category(CHECKLIST_ITEMS) {
        println!("[{}]", category);
        for item in items {
            let marker = match states.status(item.id) {
                Some(ItemStatus::Ok) => "✔",
                Some(ItemStatus::Defect) => "✘",
                None => " ",
            };
            println!("  {} {:>2}. {}", marker, item.id, item.label);
            if let Some(state) = states.get(item.id) {
                if state.status == ItemStatus::Defect && !state.description.is_empty() {
                    println!("       {}", state.description);
                }
                if state.image.is_some() {
                    println!("       [imagem anexada]");
                }
            }
        }
    }
}

async fn run_full_analysis(
    service: &dyn DiagnosisService,
    description: &str,
    image: Option<&ImageAttachment>,
) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Analisando...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = submit_analysis(service, description, image).await;
    spinner.finish_and_clear();
    let analysis = result?;

    println!("🔧 Diagnóstico: {}", analysis.diagnostico);
    println!("   Nível de risco: {}", analysis.risco);
    println!("   Ações recomendadas:");
    for (i, action) in analysis.acoes.iter().enumerate() {
        println!("   {}. {}", i + 1, action);
    }
    Ok(())
}

async fn run_assist(
    service: Arc<dyn DiagnosisService>,
    image: Option<ImageAttachment>,
    delay: Duration,
) -> Result<()> {
    println!("Descreva o problema. Linha vazia envia para análise completa.");
    let (mut debouncer, mut hints) = QuickDiagnosisDebouncer::new(Arc::clone(&service), delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut description = String::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) if !line.trim().is_empty() => {
                        if !description.is_empty() {
                            description.push(' ');
                        }
                        description.push_str(line.trim());
                        debouncer.on_input(&description);
                    }
                    _ => break,
                }
            }
            Some(hint) = hints.recv() => {
                println!("💡 Diagnóstico rápido: {}", hint);
            }
        }
    }

    debouncer.cancel();
    run_full_analysis(service.as_ref(), description.trim(), image.as_ref()).await
}
