use shared_types::User;

const LINK_PROMPT: &str =
    "🔗 Este chat ainda não está vinculado. Envie o e-mail que você usa no painel do Oikonomos.";

pub fn link_prompt() -> &'static str {
    LINK_PROMPT
}

pub fn ask_email() -> String {
    format!(
        "👋 Olá! Eu sou o assistente financeiro do Oikonomos.\n\n{}",
        LINK_PROMPT
    )
}

pub fn welcome(user: &User) -> String {
    format!("👋 Olá, {}!\n\n{}", user.display_name(), help())
}

pub fn help() -> String {
    [
        "📘 Comandos disponíveis:",
        "",
        "💸 Lançamentos",
        "• 15,50 alimentação almoço → despesa",
        "• + 3000 salário → renda",
        "• * 12 mercado → despesa na conta padrão",
        "• *+ 50 freela → renda na conta padrão",
        "",
        "🏦 Contas e metas",
        "• pagar aluguel → paga uma conta agendada",
        "• transferir 100 da nubank para carteira",
        "• guardar 200 viagem → guarda dinheiro em uma meta",
        "• sacar 50 viagem para resgate → retira de uma meta",
        "",
        "🔎 Consultas",
        "• ver categorias",
        "• ver orçamentos [categoria]",
        "• ver contas [pendentes|pagas]",
        "• ver gastos hoje [categorizado]",
        "• ver hoje → quanto ainda dá para gastar hoje",
        "• ver saldos",
        "• ver metas",
    ]
    .join("\n")
}
