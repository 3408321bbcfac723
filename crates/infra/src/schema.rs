//! Table definitions and demo seed data.

/// Tables the router writes to. Created at every startup.
pub(crate) const ORCHESTRATION_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS conversations (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at   TEXT NOT NULL,
        session_id   TEXT NOT NULL,
        user_id      TEXT NOT NULL,
        user_input   TEXT NOT NULL,
        agent_output TEXT NOT NULL,
        domain       TEXT NOT NULL,
        success      INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tool_calls (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL,
        session_id TEXT NOT NULL,
        user_id    TEXT NOT NULL,
        domain     TEXT NOT NULL,
        inputs     TEXT NOT NULL,
        outputs    TEXT NOT NULL,
        success    INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS approvals (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at   TEXT NOT NULL,
        session_id   TEXT NOT NULL,
        user_id      TEXT NOT NULL,
        request_text TEXT NOT NULL,
        domain       TEXT NOT NULL,
        status       TEXT NOT NULL,
        reasons      TEXT NOT NULL
    )
    "#,
];

/// Business tables queried by the domain tools.
pub(crate) const BUSINESS_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        name       TEXT,
        email      TEXT,
        phone      TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        name       TEXT,
        sku        TEXT,
        price      REAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vendors (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at     TEXT DEFAULT CURRENT_TIMESTAMP,
        name           TEXT,
        contact_person TEXT,
        email          TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at  TEXT DEFAULT CURRENT_TIMESTAMP,
        customer_id INTEGER REFERENCES customers(id),
        total       REAL,
        status      TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_items (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id   INTEGER REFERENCES orders(id),
        product_id INTEGER REFERENCES products(id),
        quantity   INTEGER,
        price      REAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        order_id   INTEGER REFERENCES orders(id),
        amount     REAL,
        status     TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoice_lines (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        invoice_id INTEGER REFERENCES invoices(id),
        product_id INTEGER REFERENCES products(id),
        quantity   INTEGER,
        unit_price REAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leads (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        name       TEXT,
        source     TEXT,
        status     TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stock (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP,
        product_id INTEGER REFERENCES products(id),
        quantity   INTEGER,
        warehouse  TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stock_movements (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        product_id    INTEGER REFERENCES products(id),
        date          TEXT NOT NULL,
        quantity      REAL NOT NULL,
        movement_type TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        doc_id     INTEGER PRIMARY KEY AUTOINCREMENT,
        title      TEXT NOT NULL,
        body       TEXT NOT NULL,
        category   TEXT NOT NULL,
        updated_at TEXT DEFAULT CURRENT_TIMESTAMP
    )
    "#,
];

/// Seed statements per table; each runs only while its table is empty.
pub(crate) const DEMO_SEED: &[(&str, &str)] = &[
    (
        "customers",
        "INSERT INTO customers (name, email, phone) VALUES
            ('Alice Corp', 'alice@example.com', '+1-555-1001'),
            ('Bob LLC', 'bob@example.com', '+1-555-1002')",
    ),
    (
        "products",
        "INSERT INTO products (name, sku, price) VALUES
            ('Widget A', 'WID-A', 19.99),
            ('Widget B', 'WID-B', 29.99)",
    ),
    (
        "vendors",
        "INSERT INTO vendors (name, contact_person, email) VALUES
            ('Tech Supplies Inc.', 'Jane Smith', 'jane.smith@techsupplies.com')",
    ),
    (
        "orders",
        "INSERT INTO orders (customer_id, total, status, created_at) VALUES
            (1, 49.98, 'PAID', '2024-01-15 10:00:00'),
            (2, 19.99, 'PENDING', '2024-02-03 09:30:00')",
    ),
    (
        "order_items",
        "INSERT INTO order_items (order_id, product_id, quantity, price) VALUES
            (1, 1, 1, 19.99),
            (1, 2, 1, 29.99),
            (2, 1, 1, 19.99)",
    ),
    (
        "invoices",
        "INSERT INTO invoices (order_id, amount, status) VALUES
            (1, 49.98, 'SENT'),
            (2, 19.99, 'DRAFT')",
    ),
    (
        "invoice_lines",
        "INSERT INTO invoice_lines (invoice_id, product_id, quantity, unit_price) VALUES
            (1, 1, 1, 19.99),
            (1, 2, 1, 29.99),
            (2, 1, 1, 19.99)",
    ),
    (
        "leads",
        "INSERT INTO leads (name, source, status) VALUES
            ('Charlie', 'Website', 'New'),
            ('Diane', 'Referral', 'Contacted')",
    ),
    (
        "stock",
        "INSERT INTO stock (product_id, quantity, warehouse) VALUES
            (1, 100, 'WH-1'),
            (2, 50, 'WH-2')",
    ),
    (
        "stock_movements",
        "INSERT INTO stock_movements (product_id, date, quantity, movement_type) VALUES
            (1, '2024-01-01', 40, 'OUT'), (1, '2024-02-01', 42, 'OUT'),
            (1, '2024-03-01', 45, 'OUT'), (1, '2024-04-01', 47, 'OUT'),
            (1, '2024-05-01', 50, 'OUT'), (1, '2024-06-01', 52, 'OUT'),
            (2, '2024-01-01', 20, 'OUT'), (2, '2024-02-01', 18, 'OUT'),
            (2, '2024-03-01', 19, 'OUT'), (2, '2024-04-01', 17, 'OUT')",
    ),
    (
        "documents",
        "INSERT INTO documents (title, body, category) VALUES
            ('Discount approval policy', 'All sales over $5000 require manager approval. Discounts above 15 percent need finance sign-off.', 'policy'),
            ('Payment terms', 'Standard payment terms are net 30. Late invoices accrue a 1.5 percent monthly fee.', 'policy'),
            ('Glossary: ERP', 'Enterprise Resource Planning integrates finance, sales and inventory operations.', 'glossary'),
            ('Tech Supplies contract', 'Supplier contract with Tech Supplies Inc. Lead time 14 days, minimum order 100 units.', 'contract'),
            ('Warehouse incident WH-2', 'Water damage in WH-2 on 2024-03-12 destroyed 12 units of Widget B.', 'incident'),
            ('Lead qualification playbook', 'Qualify each lead by budget, authority, need and timeline before creating a deal.', 'sales')",
    ),
];
