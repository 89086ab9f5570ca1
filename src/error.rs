use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChecklistError {
    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Chave da API Gemini não configurada. Use `vtr-checklist config --set-api-key SUA_CHAVE` ou GEMINI_API_KEY")]
    MissingApiKey,

    #[error("Arquivo não encontrado: {0}")]
    FileNotFound(String),

    #[error("Erro ao carregar imagem: {0}")]
    ImageLoad(String),

    #[error("Erro na chamada da API: {0}")]
    ApiCall(String),

    #[error("Resposta da API inválida: {0}")]
    ApiParse(String),

    /// Mensagem para o usuário; nenhum estado foi alterado
    #[error("{0}")]
    Validation(String),

    #[error("Registro não encontrado no histórico: {0}")]
    RecordNotFound(String),

    #[error("Erro de armazenamento: {0}")]
    Storage(String),

    #[error("Erro de JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro ao gerar PDF: {0}")]
    PdfGeneration(String),

    #[error("Erro ao ler arquivo. Verifique o formato (Excel/CSV): {0}")]
    UserImport(String),
}

impl From<checklist_common::Error> for ChecklistError {
    fn from(err: checklist_common::Error) -> Self {
        use checklist_common::Error as E;
        match err {
            E::Validation(msg) => ChecklistError::Validation(msg),
            E::Io(e) => ChecklistError::Io(e),
            E::Json(e) => ChecklistError::JsonParse(e),
            E::Parse(msg) => ChecklistError::ApiParse(msg),
            E::Config(msg) => ChecklistError::Config(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChecklistError>;
