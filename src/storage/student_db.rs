// Seed fixture for the bundled student database.
//
// The demo's Local backend serves this dataset read-only; this module
// regenerates it from scratch so the fixture is reproducible.
use rusqlite::{params, Connection, Result as SqliteResult};
use std::path::Path;

/// The full demo dataset: (name, class, section, marks).
pub const STUDENT_ROWS: &[(&str, &str, &str, i64)] = &[
    ("Krish", "Data Science", "A", 90),
    ("John", "Data Science", "B", 100),
    ("Mukesh", "Data Science", "A", 86),
    ("Jacob", "DEVOPS", "A", 50),
    ("Dipesh", "DEVOPS", "A", 35),
    ("Ananya", "Data Science", "B", 78),
    ("Rohan", "AI", "A", 88),
    ("Meena", "Cyber Security", "C", 64),
    ("Suresh", "AI", "B", 72),
    ("Priya", "Data Science", "A", 93),
    ("Rahul", "Cloud Computing", "B", 81),
    ("Neha", "DEVOPS", "C", 59),
    ("Amit", "Data Science", "B", 76),
    ("Simran", "AI", "A", 91),
    ("Karan", "Cyber Security", "B", 70),
    ("Aisha", "Cloud Computing", "A", 89),
    ("Vikas", "Data Science", "C", 66),
    ("Sneha", "DEVOPS", "B", 74),
    ("Pankaj", "AI", "C", 61),
    ("Tina", "Cyber Security", "A", 90),
    ("Varun", "Cloud Computing", "B", 79),
    ("Divya", "DEVOPS", "C", 55),
    ("Arjun", "Data Science", "B", 80),
    ("Kriti", "AI", "A", 95),
    ("Suraj", "Cyber Security", "C", 60),
    ("Ishita", "Cloud Computing", "B", 83),
    ("Yash", "DEVOPS", "A", 87),
    ("Ritika", "AI", "B", 77),
    ("Nikhil", "Data Science", "A", 92),
    ("Aarav", "Cloud Computing", "C", 58),
    ("Sanya", "Cyber Security", "B", 69),
    ("Harsh", "AI", "C", 62),
    ("Mitali", "DEVOPS", "B", 75),
    ("Aditya", "Data Science", "A", 85),
    ("Komal", "Cloud Computing", "B", 84),
    ("Dhruv", "Cyber Security", "C", 57),
    ("Tanvi", "AI", "A", 94),
    ("Ravi", "DEVOPS", "B", 73),
    ("Preeti", "Cloud Computing", "C", 56),
    ("Gaurav", "Cyber Security", "B", 68),
    ("Bhavna", "Data Science", "A", 89),
    ("Manav", "DEVOPS", "C", 54),
    ("Rhea", "AI", "B", 79),
    ("Vivek", "Cloud Computing", "A", 90),
    ("Snehal", "Data Science", "C", 67),
    ("Nidhi", "Cyber Security", "A", 88),
    ("Laksh", "AI", "B", 71),
    ("Shreya", "Cloud Computing", "A", 91),
    ("Aryan", "DEVOPS", "C", 53),
    ("Naina", "Cyber Security", "B", 65),
    ("Ayan", "Data Science", "A", 96),
];

/// Create (or recreate) the STUDENT table at `path` and insert the demo
/// dataset. The resulting file is what the Local backend opens read-only.
pub fn seed_student_db<P: AsRef<Path>>(path: P) -> SqliteResult<()> {
    let conn = Connection::open(path)?;

    conn.execute("DROP TABLE IF EXISTS STUDENT", [])?;
    conn.execute(
        "CREATE TABLE STUDENT (
            NAME    VARCHAR(25),
            CLASS   VARCHAR(25),
            SECTION VARCHAR(25),
            MARKS   INT
        )",
        [],
    )?;

    let mut stmt = conn.prepare("INSERT INTO STUDENT VALUES (?1, ?2, ?3, ?4)")?;
    for (name, class, section, marks) in STUDENT_ROWS {
        stmt.execute(params![name, class, section, marks])?;
    }
    drop(stmt);

    conn.close().map_err(|(_, e)| e)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_seed_inserts_all_rows() {
        let file = NamedTempFile::new().unwrap();
        seed_student_db(file.path()).unwrap();

        let conn = Connection::open(file.path()).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM STUDENT", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 51);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let file = NamedTempFile::new().unwrap();
        seed_student_db(file.path()).unwrap();
        seed_student_db(file.path()).unwrap();

        let conn = Connection::open(file.path()).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM STUDENT", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 51);
    }

    #[test]
    fn test_data_science_class_size() {
        let file = NamedTempFile::new().unwrap();
        seed_student_db(file.path()).unwrap();

        let conn = Connection::open(file.path()).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM STUDENT WHERE CLASS = 'Data Science'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 13);
    }
}
