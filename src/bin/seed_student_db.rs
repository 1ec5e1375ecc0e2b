// Regenerate the bundled student database fixture.
//
// Usage: seed_student_db [path]   (default: ./student.db)
use sql_chat_backend::storage::seed_student_db;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./student.db".to_string());

    seed_student_db(&path)?;
    println!("Seeded student database at {}", path);

    Ok(())
}
