use crate::helpers::money::format_brl;
use commands::Usage;
use shared_types::CategoryKind;
use thiserror::Error;

pub const GENERIC_ERROR: &str = "❌ Ocorreu um erro. Tente novamente mais tarde.";

/// Failures shown to the user as a chat reply.
///
/// Everything except `Internal` is the user's input not matching their data;
/// `Internal` wraps storage or network errors and is also reported upstream.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("❌ Categoria não encontrada. Categorias de {}: {}", .kind.label().to_lowercase(), available_list(.available))]
    UnknownCategory {
        kind: CategoryKind,
        available: Vec<String>,
    },

    #[error("❌ Você ainda não tem contas cadastradas. Crie uma no painel.")]
    NoAccounts,

    #[error("❌ Nenhuma conta padrão definida. Escolha uma no painel.")]
    NoDefaultAccount,

    #[error("❌ Conta \"{0}\" não encontrada.")]
    AccountNotFound(String),

    #[error("❌ A conta de origem e a de destino são a mesma.")]
    SameAccount,

    #[error("❌ Meta \"{0}\" não encontrada.")]
    GoalNotFound(String),

    #[error("❌ Saldo insuficiente na meta {goal}: disponível {}.", brl(.saved))]
    InsufficientGoalFunds { goal: String, saved: f64 },

    #[error("❌ Nenhuma conta pendente encontrada para \"{0}\".")]
    BillNotFound(String),

    #[error("❌ Nenhum orçamento definido para \"{0}\" neste mês.")]
    BudgetNotFound(String),

    #[error("❌ Formato inválido. {}", .0.text())]
    Usage(Usage),

    #[error("🤔 Não entendi. Envie /ajuda para ver os comandos.")]
    UnknownCommand,

    #[error("⌛ Esta seleção expirou. Envie o lançamento novamente.")]
    SelectionExpired,

    #[error("{}", GENERIC_ERROR)]
    Internal(#[from] anyhow::Error),
}

fn brl(value: &f64) -> String {
    format_brl(*value)
}

fn available_list(names: &[String]) -> String {
    if names.is_empty() {
        "nenhuma cadastrada".to_string()
    } else {
        names.join(", ")
    }
}
