use super::{Bot, BotError, Reply};
use crate::database::{accounts, categories, goals};
use crate::helpers::money::{format_brl, percent};
use chrono::{DateTime, Utc};
use commands::find_by_name;
use shared_types::{CategoryKind, Goal, GoalStatus, User};
use tracing::info;

fn progress_line(goal: &Goal) -> String {
    format!(
        "{} / {} ({}%)",
        format_brl(goal.saved_amount),
        format_brl(goal.target_amount),
        percent(goal.saved_amount, goal.target_amount)
    )
}

impl Bot {
    pub(super) async fn contribute(
        &self,
        user: &User,
        amount: f64,
        goal_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        let active = goals::list_goals(self.db.clone(), user.id, Some(GoalStatus::Active)).await?;
        let goal = find_by_name(goal_name, &active)
            .ok_or_else(|| BotError::GoalNotFound(goal_name.to_string()))?;
        let account = accounts::get_default(self.db.clone(), user.id)
            .await?
            .ok_or(BotError::NoDefaultAccount)?;

        let goal = goals::contribute(self.db.clone(), goal.id, account.id, amount, now.timestamp()).await?;
        info!("User {} saved {} into goal {}", user.id, amount, goal.id);

        let mut text = format!(
            "💰 Guardado {} na meta {} (debitado de {}).\n📈 Progresso: {}",
            format_brl(amount),
            goal.name,
            account.name,
            progress_line(&goal)
        );
        if goal.status == GoalStatus::Completed {
            text.push_str(&format!("\n🎉 Parabéns! Você atingiu a meta {}!", goal.name));
        }

        Ok(Reply::text(text))
    }

    pub(super) async fn withdraw(
        &self,
        user: &User,
        amount: f64,
        goal_name: &str,
        category_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        let all = goals::list_goals(self.db.clone(), user.id, None).await?;
        let goal = find_by_name(goal_name, &all)
            .ok_or_else(|| BotError::GoalNotFound(goal_name.to_string()))?;

        let income =
            categories::list_categories(self.db.clone(), user.id, Some(CategoryKind::Income)).await?;
        let category = find_by_name(category_name, &income).ok_or_else(|| BotError::UnknownCategory {
            kind: CategoryKind::Income,
            available: income.iter().map(|c| c.name.clone()).collect(),
        })?;

        if amount > goal.saved_amount {
            return Err(BotError::InsufficientGoalFunds {
                goal: goal.name.clone(),
                saved: goal.saved_amount,
            });
        }

        let account = accounts::get_default(self.db.clone(), user.id)
            .await?
            .ok_or(BotError::NoDefaultAccount)?;

        let goal = goals::withdraw(
            self.db.clone(),
            goal.id,
            account.id,
            amount,
            &category.name,
            now.timestamp(),
        )
        .await?;
        info!("User {} withdrew {} from goal {}", user.id, amount, goal.id);

        Ok(Reply::text(format!(
            "💸 Resgatado {} da meta {} para {} (creditado em {}).\n📉 Restante na meta: {}",
            format_brl(amount),
            goal.name,
            category.name,
            account.name,
            progress_line(&goal)
        )))
    }

    pub(super) async fn list_goals(&self, user: &User) -> Result<Reply, BotError> {
        let all = goals::list_goals(self.db.clone(), user.id, None).await?;
        if all.is_empty() {
            return Ok(Reply::text("🎯 Você ainda não tem metas cadastradas."));
        }

        let mut lines = vec!["🎯 Suas metas:".to_string()];
        for goal in &all {
            let mark = if goal.status == GoalStatus::Completed {
                "✅"
            } else {
                "•"
            };
            lines.push(format!("{} {}: {}", mark, goal.name, progress_line(goal)));
        }

        Ok(Reply::text(lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use crate::bot::test_support::*;
    use crate::bot::BotError;
    use crate::database::{accounts, goals, test_support as db_support};
    use shared_types::CategoryKind;

    #[tokio::test]
    async fn test_contribute_until_completed() {
        let h = harness(vec![]).await;
        let account = db_support::account(&h.db, h.user.id, "Nubank", 1000.0).await;
        goals::create_goal(h.db.clone(), h.user.id, "Viagem Japão", 500.0)
            .await
            .unwrap();

        let reply = h.say("guardar 200 viagem japao").await;
        assert!(reply.contains("Progresso: R$ 200,00 / R$ 500,00 (40%)"));
        assert!(!reply.contains("🎉"));

        let reply = h.say("guardar 300 viagem").await;
        assert!(reply.contains("🎉"));

        let account = accounts::get_account(h.db.clone(), h.user.id, account.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.balance, 500.0);

        // completed goals no longer take contributions
        assert_eq!(
            h.say("guardar 10 viagem").await,
            BotError::GoalNotFound("viagem".to_string()).to_string()
        );
        assert!(h.say("ver metas").await.contains("✅ Viagem Japão"));
    }

    #[tokio::test]
    async fn test_withdraw() {
        let h = harness(vec![]).await;
        db_support::account(&h.db, h.user.id, "Nubank", 100.0).await;
        db_support::category(&h.db, h.user.id, "Resgate", CategoryKind::Income).await;
        let goal = goals::create_goal(h.db.clone(), h.user.id, "Reserva", 1000.0)
            .await
            .unwrap();
        h.say("guardar 80 reserva").await;

        let reply = h.say("sacar 100 reserva para resgate").await;
        assert!(reply.contains("Saldo insuficiente"));

        let reply = h.say("sacar 30 reserva para bonus").await;
        assert!(reply.contains("Categorias de renda: Resgate"));

        let reply = h.say("sacar 30 reserva para resgate").await;
        assert!(reply.contains("Restante na meta: R$ 50,00 / R$ 1.000,00 (5%)"));

        let goals = goals::list_goals(h.db.clone(), h.user.id, None).await.unwrap();
        assert_eq!(goals[0].id, goal.id);
        assert_eq!(goals[0].saved_amount, 50.0);
    }

    #[tokio::test]
    async fn test_list_goals_empty() {
        let h = harness(vec![]).await;
        assert!(h.say("ver metas").await.contains("ainda não tem metas"));
    }
}
