use crate::TableDescriptor;

/// Descriptors served when no database is configured: a small e-commerce
/// schema, enough to exercise retrieval and prompt building end to end.
pub fn fallback_tables() -> Vec<TableDescriptor> {
    vec![
        TableDescriptor::new(
            "customers",
            "Stores customers information",
            [
                "customer_id",
                "customer_name",
                "email",
                "phone",
                "city",
                "state",
                "country",
                "zip_code",
            ],
        ),
        TableDescriptor::new(
            "orders",
            "Stores orders by the customers",
            [
                "order_id",
                "customer_id",
                "order_date",
                "total_amount",
                "status",
                "shipping_address",
            ],
        ),
        TableDescriptor::new(
            "products",
            "Stores product catalog information",
            [
                "product_id",
                "product_name",
                "category_id",
                "price",
                "stock_quantity",
                "supplier_id",
            ],
        ),
        TableDescriptor::new(
            "suppliers",
            "Stores supplier information",
            [
                "supplier_id",
                "contact_name",
                "email",
                "phone",
                "address",
                "city",
                "country",
            ],
        ),
        TableDescriptor::new(
            "categories",
            "Stores product categories",
            ["category_id", "category_name", "description"],
        ),
        TableDescriptor::new(
            "payments",
            "Stores payment information for orders",
            [
                "payment_id",
                "order_id",
                "payment_date",
                "amount",
                "payment_method",
                "payment_status",
            ],
        ),
        TableDescriptor::new(
            "reviews",
            "Stores customer reviews for products",
            [
                "review_id",
                "product_id",
                "customer_id",
                "rating",
                "review_text",
                "review_date",
            ],
        ),
        TableDescriptor::new(
            "employees",
            "Stores company employee information",
            [
                "employee_id",
                "first_name",
                "last_name",
                "email",
                "phone",
                "position",
                "department",
                "hire_date",
            ],
        ),
    ]
}
