use catalog::TableDescriptor;

const INSTRUCTION: &str = "You are a SQL expert. Given the following database schema, \
generate a valid SQL query that answers the user's question. \
Only return the SQL code, nothing else.";

/// Render the grounding prompt for `question` from `tables`, in the given order.
///
/// Only the tables passed in are described; the question is embedded verbatim.
pub fn build_prompt<'a, I>(tables: I, question: &str) -> String
where
    I: IntoIterator<Item = &'a TableDescriptor>,
{
    let mut schema = String::from("Database Schema:\n");
    for table in tables {
        schema.push_str("- Table: ");
        schema.push_str(&table.qualified_name);
        schema.push_str("\n  Description: ");
        schema.push_str(&table.description);
        schema.push_str("\n  Columns: ");
        schema.push_str(&table.columns.join(", "));
        schema.push_str("\n\n");
    }

    format!("{INSTRUCTION}\n\n{schema}This is what the user wants: {question}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> TableDescriptor {
        TableDescriptor::new(name, format!("{name} table"), ["id", "name"])
    }

    #[test]
    fn renders_tables_in_order() {
        let tables = [table("orders"), table("customers")];
        let prompt = build_prompt(&tables, "Q");
        let orders = prompt.find("- Table: orders").unwrap();
        let customers = prompt.find("- Table: customers").unwrap();
        assert!(orders < customers);
        assert!(prompt.contains("  Columns: id, name\n"));
        assert!(prompt.ends_with("This is what the user wants: Q\n"));
    }

    #[test]
    fn starts_with_instruction() {
        let prompt = build_prompt(&[table("t")], "q");
        assert!(prompt.starts_with("You are a SQL expert."));
        assert!(prompt.contains("Only return the SQL code, nothing else."));
    }

    #[test]
    fn empty_description_and_columns_still_render() {
        let prompt = build_prompt(&[TableDescriptor::new("bare", "", Vec::<String>::new())], "q");
        assert!(prompt.contains("- Table: bare\n  Description: \n  Columns: \n"));
    }

    #[test]
    fn question_is_verbatim() {
        let question = "  Which customers spent over 250?  ";
        assert!(build_prompt(&[table("t")], question).contains(question));
    }
}
