//! Diretório local de usuários
//!
//! Login = correspondência exata de e-mail + CPF. Sem senha, sem token.

use crate::confirm::Confirm;
use crate::error::{ChecklistError, Result};
use crate::storage::{ChecklistRepository, KeyValueStore};
use calamine::{open_workbook_auto, Data, Reader};
use checklist_common::{Role, User};
use std::path::Path;
use tracing::info;

const MISSING_FIELDS: &str = "Por favor, preencha todos os campos.";
const REMOVE_USER_PROMPT: &str = "Tem certeza que deseja remover este usuário?";

/// CPFs do administrador principal (não removível)
const PROTECTED_CPFS: &[&str] = &["admin", "00000000000"];

pub fn default_admin() -> User {
    User {
        name: "Administrador".into(),
        email: "admin@vtr.local".into(),
        cpf: "00000000000".into(),
        role: Role::Admin,
    }
}

pub struct UserDirectory<S: KeyValueStore> {
    users: Vec<User>,
    repo: ChecklistRepository<S>,
}

impl<S: KeyValueStore> UserDirectory<S> {
    pub fn open(store: S) -> Self {
        let repo = ChecklistRepository::new(store);
        let users = repo.load_users();
        Self { users, repo }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn into_store(self) -> S {
        self.repo.into_inner()
    }

    /// Cria o administrador principal quando o diretório está vazio
    pub fn ensure_default_admin(&mut self) -> Result<bool> {
        if !self.users.is_empty() {
            return Ok(false);
        }
        self.users.push(default_admin());
        self.repo.save_users(&self.users)?;
        info!("administrador padrão criado");
        Ok(true)
    }

    /// None = credenciais inválidas ou usuário não encontrado
    pub fn login(&self, email: &str, cpf: &str) -> Result<Option<&User>> {
        if email.is_empty() || cpf.is_empty() {
            return Err(ChecklistError::Validation(MISSING_FIELDS.into()));
        }
        Ok(self.users.iter().find(|u| u.email == email && u.cpf == cpf))
    }

    pub fn add(&mut self, user: User) -> Result<()> {
        if user.name.is_empty() || user.email.is_empty() || user.cpf.is_empty() {
            return Err(ChecklistError::Validation("Preencha todos os campos.".into()));
        }
        if self.is_duplicate(&user) {
            return Err(ChecklistError::Validation(
                "Usuário com este CPF ou Email já existe.".into(),
            ));
        }
        self.users.push(user);
        self.repo.save_users(&self.users)
    }

    /// Ok(false) se cancelado ou CPF inexistente
    pub fn remove(&mut self, cpf: &str, confirm: &dyn Confirm) -> Result<bool> {
        if PROTECTED_CPFS.contains(&cpf) {
            return Err(ChecklistError::Validation(
                "Não é possível remover o administrador principal.".into(),
            ));
        }
        if !confirm.confirm(REMOVE_USER_PROMPT) {
            return Ok(false);
        }
        let before = self.users.len();
        self.users.retain(|u| u.cpf != cpf);
        if self.users.len() == before {
            return Ok(false);
        }
        self.repo.save_users(&self.users)?;
        Ok(true)
    }

    /// Importa a primeira planilha; devolve quantos usuários foram adicionados
    ///
    /// Colunas: nome, email, cpf, role (opcional). Linhas incompletas ou
    /// duplicadas são ignoradas.
    pub fn import_spreadsheet(&mut self, path: &Path) -> Result<usize> {
        let rows = read_user_rows(path)?;
        let mut added = 0;
        for user in rows {
            if self.is_duplicate(&user) {
                continue;
            }
            self.users.push(user);
            added += 1;
        }
        self.repo.save_users(&self.users)?;
        info!(added, "usuários importados");
        Ok(added)
    }

    fn is_duplicate(&self, user: &User) -> bool {
        self.users
            .iter()
            .any(|u| u.cpf == user.cpf || u.email == user.email)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        // CPF digitado como número na planilha
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

fn column_index(header: &[String], names: &[&str]) -> Option<usize> {
    names
        .iter()
        .find_map(|name| header.iter().position(|h| h == name))
}

/// Lê as linhas completas da primeira planilha
pub fn read_user_rows(path: &Path) -> Result<Vec<User>> {
    if !path.exists() {
        return Err(ChecklistError::FileNotFound(path.display().to_string()));
    }
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ChecklistError::UserImport(e.to_string()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ChecklistError::UserImport("planilha vazia".into()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ChecklistError::UserImport(e.to_string()))?;

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(cell_text).collect(),
        None => return Ok(Vec::new()),
    };
    let name_col = column_index(&header, &["nome", "Nome", "NAME"]);
    let email_col = column_index(&header, &["email", "Email", "EMAIL"]);
    let cpf_col = column_index(&header, &["cpf", "CPF", "doc"]);
    let role_col = column_index(&header, &["role", "funcao"]);

    let get = |cells: &[Data], col: Option<usize>| -> String {
        col.and_then(|i| cells.get(i)).map(cell_text).unwrap_or_default()
    };

    let users = rows
        .filter_map(|cells| {
            let name = get(cells, name_col);
            let email = get(cells, email_col);
            let cpf = get(cells, cpf_col);
            if name.is_empty() || email.is_empty() || cpf.is_empty() {
                return None;
            }
            Some(User {
                name,
                email,
                cpf,
                role: Role::parse_lenient(&get(cells, role_col)),
            })
        })
        .collect();
    Ok(users)
}
