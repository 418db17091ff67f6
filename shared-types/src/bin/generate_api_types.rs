use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for the dashboard
    let mut types = Vec::new();

    // User types
    types.push(clean_type(User::export_to_string()?));
    types.push(clean_type(CreateUserRequest::export_to_string()?));
    types.push(clean_type(UsersResponse::export_to_string()?));

    // Account types
    types.push(clean_type(Account::export_to_string()?));
    types.push(clean_type(CreateAccountRequest::export_to_string()?));
    types.push(clean_type(AccountsResponse::export_to_string()?));

    // Category types
    types.push(clean_type(CategoryKind::export_to_string()?));
    types.push(clean_type(Category::export_to_string()?));
    types.push(clean_type(CreateCategoryRequest::export_to_string()?));
    types.push(clean_type(CategoriesResponse::export_to_string()?));

    // Goal types
    types.push(clean_type(GoalStatus::export_to_string()?));
    types.push(clean_type(Goal::export_to_string()?));
    types.push(clean_type(CreateGoalRequest::export_to_string()?));
    types.push(clean_type(GoalsResponse::export_to_string()?));

    // Budget types
    types.push(clean_type(Budget::export_to_string()?));
    types.push(clean_type(BudgetEntry::export_to_string()?));
    types.push(clean_type(SetBudgetsRequest::export_to_string()?));
    types.push(clean_type(BudgetsResponse::export_to_string()?));

    // Bill types
    types.push(clean_type(BillStatus::export_to_string()?));
    types.push(clean_type(ScheduledTransaction::export_to_string()?));
    types.push(clean_type(CreateBillRequest::export_to_string()?));
    types.push(clean_type(BillsResponse::export_to_string()?));

    // Transaction types
    types.push(clean_type(TransactionKind::export_to_string()?));
    types.push(clean_type(Transaction::export_to_string()?));
    types.push(clean_type(PendingTransaction::export_to_string()?));
    types.push(clean_type(TransactionsResponse::export_to_string()?));

    // Job types
    types.push(clean_type(JobReport::export_to_string()?));

    let output_dir = Path::new("../oikonomos-dashboard/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let lines: Vec<&str> = type_def.lines().collect();

    // Everything lands in a single file, so cross-type imports are dropped
    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .cloned()
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
