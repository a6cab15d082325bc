use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use budget_analysis::{Category, NewRecord, UserID, initialize_db, insert_income, insert_record};

/// A utility for creating a test database for the budget analysis API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const TEST_USER: UserID = UserID::new(1);

const FOOD: [(&str, &str, &str, i64); 5] = [
    ("Tesco", "Dairy", "Milk", 95),
    ("Tesco", "Bread", "Sourdough", 250),
    ("Sainsburys", "Fruit", "Apples", 180),
    ("Subway", "Takeaway", "Sandwich", 450),
    ("Waitrose", "Vegetables", "Carrots", 60),
];

const GENERAL: [(&str, &str, &str, i64); 3] = [
    ("Boots", "Health", "Toothpaste", 199),
    ("Amazon", "Books", "Paperback", 899),
    ("Argos", "Household", "Kettle", 2499),
];

const SOCIAL: [(&str, &str, &str, i64); 2] = [
    ("Wetherspoons", "Climbing club", "Drinks", 1250),
    ("Cinema", "Film society", "Tickets", 900),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating a year of records for user {TEST_USER}...");

    let today = OffsetDateTime::now_utc().date();
    let tx = conn.unchecked_transaction()?;

    for days_ago in 0..365 {
        let date = today - Duration::days(days_ago);
        insert_day(date, days_ago as usize, &tx)?;
    }

    tx.commit()?;

    println!("Success!");

    Ok(())
}

fn insert_day(date: Date, seed: usize, conn: &Connection) -> Result<(), Box<dyn Error>> {
    if date.day() == 1 {
        insert_income(TEST_USER, date, "Salary", 250_000, conn)?;
        insert(Category::Bills, date, ("", "", "Rent", 95_000), conn)?;
        insert(Category::Bills, date, ("", "", "Electricity", 4_500), conn)?;
        insert(Category::Funds, date, ("", "", "Index fund", 20_000), conn)?;
    }

    insert(Category::Food, date, FOOD[seed % FOOD.len()], conn)?;

    if seed % 3 == 0 {
        insert(Category::Food, date, FOOD[(seed / 3) % FOOD.len()], conn)?;
    }

    if seed % 4 == 0 {
        insert(Category::General, date, GENERAL[seed % GENERAL.len()], conn)?;
    }

    if seed % 7 == 5 {
        insert(Category::Social, date, SOCIAL[seed % SOCIAL.len()], conn)?;
    }

    let holiday = match seed {
        100..=106 => Some(("Premier Inn", "Lake District", "Hotel", 8_500)),
        250..=253 => Some(("Ryanair", "Lisbon", "Flights", 6_000)),
        _ => None,
    };

    if let Some(record) = holiday {
        insert(Category::Holiday, date, record, conn)?;
    }

    Ok(())
}

fn insert(
    category: Category,
    date: Date,
    (shop, sub_category, item, cost): (&str, &str, &str, i64),
    conn: &Connection,
) -> Result<(), Box<dyn Error>> {
    let record = NewRecord {
        user_id: TEST_USER,
        date,
        item,
        sub_category,
        shop,
        cost,
    };

    insert_record(category, &record, conn)?;

    Ok(())
}
