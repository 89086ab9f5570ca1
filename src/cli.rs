use checklist_common::ItemStatus;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vtr-checklist")]
#[command(about = "Checklist de vistoria de ambulância com histórico, PDF e IA mecânico", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log detalhado
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Responde "sim" a todas as confirmações
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Diretório dos dados (padrão: configuração ou ~/.local/share/vtr-checklist)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mostra o checklist atual e o progresso
    Show,

    /// Marca um item como ok/defect (repetir o mesmo status desmarca)
    Status {
        /// Id do item (1-22)
        item: u32,

        /// ok ou defect
        status: ItemStatus,
    },

    /// Descreve o defeito de um item
    Describe {
        item: u32,

        /// Descrição do problema
        text: String,
    },

    /// Anexa ou remove a foto de um item
    Image {
        item: u32,

        /// Arquivo de imagem
        #[arg(required_unless_present = "remove")]
        path: Option<PathBuf>,

        /// Remove a imagem anexada
        #[arg(long, conflicts_with = "path")]
        remove: bool,
    },

    /// Edita o cabeçalho da vistoria
    Header {
        #[arg(long)]
        condutor: Option<String>,

        /// Data (AAAA-MM-DD)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        turno: Option<String>,

        /// Número da VTR
        #[arg(long)]
        vtr: Option<String>,
    },

    /// Limpa o checklist atual (mantém o condutor)
    Clear,

    /// Salva/finaliza o checklist no histórico
    Commit,

    /// Histórico de checklists
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Gera o relatório PDF
    Report {
        /// Id de um registro do histórico (padrão: checklist atual)
        #[arg(long)]
        history: Option<String>,

        /// Arquivo ou diretório de saída
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Análise completa de um problema (diagnóstico, risco, ações)
    Analyze {
        /// Descrição do problema
        #[arg(short, long, default_value = "")]
        description: String,

        /// Foto do problema
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// IA mecânico interativo: diagnóstico rápido enquanto digita, linha vazia envia
    Assist {
        /// Foto do problema
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Usuários
    Users {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Mostra/edita a configuração
    Config {
        /// Define a chave da API Gemini
        #[arg(long)]
        set_api_key: Option<String>,

        /// Mostra a configuração
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Lista os registros (mais recente primeiro)
    List,

    /// Mostra um registro
    Show { id: String },

    /// Exclui um registro
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Lista os usuários
    List,

    /// Cadastra um usuário
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        cpf: String,

        /// admin ou user
        #[arg(long, default_value = "user")]
        role: String,
    },

    /// Remove um usuário pelo CPF
    Remove { cpf: String },

    /// Importa usuários de uma planilha (colunas nome, email, cpf, role)
    Import { file: PathBuf },

    /// Entra no sistema (e-mail + CPF)
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        cpf: String,
    },
}
