//! Reference table of public figures, matched by their main arcana.

use serde::{Deserialize, Serialize};

use crate::arcana::Arcana;
use crate::date::{BirthDate, DateError};
use crate::matrix::build_matrix;

/// Name and `DD.MM.YYYY` birth date.
pub const CELEBRITIES: [(&str, &str); 41] = [
    ("Marilyn Monroe", "01.06.1926"),
    ("Keanu Reeves", "02.09.1964"),
    ("Shakira", "02.02.1977"),
    ("Princess Diana", "01.07.1961"),
    ("Benedict Cumberbatch", "19.07.1976"),
    ("Angelina Jolie", "04.06.1975"),
    ("Adele", "05.05.1988"),
    ("Elon Musk", "28.06.1971"),
    ("Steve Jobs", "24.02.1955"),
    ("George Clooney", "06.05.1961"),
    ("Will Smith", "25.09.1968"),
    ("Natalie Portman", "09.06.1981"),
    ("Johnny Depp", "09.06.1963"),
    ("Pavel Durov", "10.10.1984"),
    ("Leonardo DiCaprio", "11.11.1974"),
    ("Rihanna", "20.02.1988"),
    ("Ryan Gosling", "12.11.1980"),
    ("Taylor Swift", "13.12.1989"),
    ("Albert Einstein", "14.03.1879"),
    ("Monica Bellucci", "30.09.1964"),
    ("Tom Hardy", "15.09.1977"),
    ("Madonna", "16.08.1958"),
    ("Arnold Schwarzenegger", "30.07.1947"),
    ("Billie Eilish", "18.12.2001"),
    ("Coco Chanel", "19.08.1883"),
    ("David Beckham", "02.05.1975"),
    ("Lady Gaga", "28.03.1986"),
    ("Brad Pitt", "18.12.1963"),
    ("Beyonce", "04.09.1981"),
    ("Cillian Murphy", "25.05.1976"),
    ("Jim Carrey", "17.01.1962"),
    ("Mark Zuckerberg", "14.05.1984"),
    ("Quentin Tarantino", "27.03.1963"),
    ("Cristiano Ronaldo", "05.02.1985"),
    ("Kanye West", "08.06.1977"),
    ("Zendaya", "01.09.1996"),
    ("Scarlett Johansson", "22.11.1984"),
    ("Jared Leto", "26.12.1971"),
    ("Audrey Hepburn", "04.05.1929"),
    ("Eminem", "17.10.1972"),
    ("Matthew McConaughey", "04.11.1969"),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelebrityRecord {
    pub name: String,
    /// `DD.MM.YYYY`
    pub birth_date: String,
    /// `personal.center` of the person's matrix.
    pub main_arcana: Arcana,
}

impl CelebrityRecord {
    pub fn compute(name: &str, birth_date: &str) -> Result<Self, DateError> {
        let date = BirthDate::parse(birth_date)?;
        Ok(Self {
            name: name.to_string(),
            birth_date: date.to_display(),
            main_arcana: build_matrix(date).main_arcana(),
        })
    }
}

/// Run every reference entry through the builder.
pub fn seed_records() -> Vec<CelebrityRecord> {
    CELEBRITIES
        .iter()
        .filter_map(|(name, date)| CelebrityRecord::compute(name, date).ok())
        .collect()
}

/// Records sharing `center` as their main arcana.
pub fn match_center(records: &[CelebrityRecord], center: Arcana) -> Vec<&CelebrityRecord> {
    records.iter().filter(|r| r.main_arcana == center).collect()
}
