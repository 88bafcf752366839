//! Writes a synthetic employee table so the dashboard can run without real
//! HR data. Output is CSV, or Parquet when the file ends in `.parquet`.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

#[derive(Parser, Debug)]
#[command(about = "Generate a synthetic HR dataset")]
struct Args {
    /// Number of employees.
    #[arg(long, default_value_t = 1470)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value = "input_data/raw_hr_data.csv")]
    out: PathBuf,
}

const TEXT_COLUMNS: [&str; 6] = [
    "Attrition",
    "Department",
    "Gender",
    "JobRole",
    "MaritalStatus",
    "OverTime",
];

const NUMERIC_COLUMNS: [&str; 13] = [
    "EmployeeNumber",
    "Age",
    "DistanceFromHome",
    "JobSatisfaction",
    "MonthlyIncome",
    "PercentSalaryHike",
    "PerformanceRating",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "YearsAtCompany",
    "YearsInCurrentRole",
    "YearsSinceLastPromotion",
    "YearsWithCurrManager",
];

const DEPARTMENTS: [(&str, &[&str]); 3] = [
    ("Human Resources", &["Human Resources", "Manager"]),
    (
        "Research & Development",
        &[
            "Research Scientist",
            "Laboratory Technician",
            "Manufacturing Director",
            "Healthcare Representative",
            "Research Director",
        ],
    ),
    ("Sales", &["Sales Executive", "Sales Representative", "Manager"]),
];

const MARITAL: [&str; 3] = ["Single", "Married", "Divorced"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        let span = (hi - lo + 1).max(1) as u64;
        lo + (self.next_u64() % span) as i64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_u64() as usize % items.len()]
    }
}

/// One synthetic employee: text cells then numeric cells, in column order.
struct Employee {
    text: [String; TEXT_COLUMNS.len()],
    numbers: [i64; NUMERIC_COLUMNS.len()],
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

fn generate_employee(id: usize, rng: &mut SimpleRng) -> Employee {
    let (department, roles) = *rng.pick(&DEPARTMENTS);
    let role = *rng.pick(roles);
    let gender = if rng.chance(0.6) { "Male" } else { "Female" };
    let marital = *rng.pick(&MARITAL);

    let age = rng.range(18, 60);
    let total_working_years = rng.range(0, (age - 18).min(40));
    let years_at_company = rng.range(0, total_working_years);
    let years_in_role = rng.range(0, years_at_company);
    let years_since_promotion = rng.range(0, years_at_company);
    let years_with_manager = rng.range(0, years_in_role);
    let performance = if rng.chance(0.15) { rng.range(1, 2) } else { rng.range(3, 4) };
    let satisfaction = rng.range(1, 4);
    let distance = rng.range(1, 29);
    let over_time = rng.chance(0.28);

    // Short tenure, long commutes and low satisfaction raise the odds of leaving.
    let mut p_leave = 0.08;
    if years_at_company < 3 {
        p_leave += 0.08;
    }
    if distance > 20 {
        p_leave += 0.05;
    }
    if satisfaction == 1 {
        p_leave += 0.07;
    }
    if over_time {
        p_leave += 0.06;
    }
    let attrition = rng.chance(p_leave);

    let income = 1000 + 250 * total_working_years + rng.range(0, 4000);

    Employee {
        text: [
            yes_no(attrition),
            department.to_string(),
            gender.to_string(),
            role.to_string(),
            marital.to_string(),
            yes_no(over_time),
        ],
        numbers: [
            id as i64 + 1,
            age,
            distance,
            satisfaction,
            income,
            rng.range(11, 25),
            performance,
            total_working_years,
            rng.range(0, 6),
            years_at_company,
            years_in_role,
            years_since_promotion,
            years_with_manager,
        ],
    }
}

fn write_csv(path: &Path, employees: &[Employee]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(TEXT_COLUMNS.iter().chain(NUMERIC_COLUMNS.iter()))?;
    for e in employees {
        let numbers = e.numbers.iter().map(i64::to_string);
        writer.write_record(e.text.iter().cloned().chain(numbers))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, employees: &[Employee]) -> anyhow::Result<()> {
    let fields: Vec<Field> = TEXT_COLUMNS
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, false))
        .chain(
            NUMERIC_COLUMNS
                .iter()
                .map(|name| Field::new(*name, DataType::Int64, false)),
        )
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = Vec::new();
    for i in 0..TEXT_COLUMNS.len() {
        let values: StringArray = employees.iter().map(|e| Some(e.text[i].as_str())).collect();
        columns.push(Arc::new(values));
    }
    for i in 0..NUMERIC_COLUMNS.len() {
        let values: Int64Array = employees.iter().map(|e| Some(e.numbers[i])).collect();
        columns.push(Arc::new(values));
    }

    let batch = RecordBatch::try_new(schema.clone(), columns)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let employees: Vec<Employee> = (0..args.rows)
        .map(|id| generate_employee(id, &mut rng))
        .collect();

    if let Some(dir) = args.out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let is_parquet = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&args.out, &employees)?;
    } else {
        write_csv(&args.out, &employees)?;
    }

    println!("Written {} employees to {}", employees.len(), args.out.display());
    Ok(())
}
