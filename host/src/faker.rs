//! Synthetic 834-style eligibility file generation.
//!
//! Produces plausible enrollment feeds for exercising integration
//! pipelines without real member data. The rendered segment layout stays
//! within [`record::Schema::sample_834`], so a generated file parses back
//! into exactly one record per enrollee; the envelope lines (ISA, GS, ST,
//! BGN, N1) are unknown to that schema and are skipped by the parser.

use std::io::{self, Write};

use chrono::{Duration, Utc};
use fake::faker::address::en::{BuildingNumber, CityName, SecondaryAddress, StateAbbr, StreetName, ZipCode};
use fake::faker::internet::en::FreeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Household shapes sampled per employee: (spouse/partner count, child
/// count). Duplicated entries raise that shape's probability.
const POPULATION: &[(u32, u32)] = &[
    (0, 0),
    (0, 0),
    (1, 0),
    (1, 0),
    (1, 1),
    (1, 1),
    (1, 1),
    (0, 1),
    (0, 1),
    (1, 2),
    (1, 2),
    (1, 2),
    (0, 2),
    (1, 3),
    (1, 3),
];

const RELATIONSHIP_SELF: &str = "18";
const RELATIONSHIP_SPOUSE: &str = "01";
const RELATIONSHIP_PARTNER: &str = "53";
const RELATIONSHIP_CHILD: &str = "19";
const RELATIONSHIP_WARD: &str = "15";

const PLAN_NUMBERS: &[&str] = &["00000", "02700", "03100", "02200", "04000", "04004"];
const COVERAGE_TYPES: &[&str] = &["ECH", "FAM"];

/// Every 240th dependent is generated as a court-appointed ward.
const WARD_CADENCE: usize = 240;

/// One generated plan member, sponsor or dependent.
#[derive(Debug, Clone)]
pub struct Enrollee {
    pub primary: bool,
    pub ft_status: String,
    pub subscriber_number: String,
    pub benefit_number: String,
    pub relationship_code: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_initial: char,
    pub ssn: String,
    pub email: String,
    pub home_phone: String,
    pub cell_phone: String,
    pub street_address: String,
    pub apt_number: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub gender: char,
    pub birthdate: String,
    pub plan_number: String,
    pub coverage_type: String,
    pub premium: String,
}

/// Generates rosters of fake enrollees and renders them as segment files.
#[derive(Debug)]
pub struct Generator {
    employee_count: usize,
    dependent_count: usize,
    ward_count: usize,
    rng: StdRng,
}

impl Generator {
    /// Generator for `employee_count` employees with a random seed.
    pub fn new(employee_count: usize) -> Self {
        Self::from_rng(employee_count, StdRng::from_entropy())
    }

    /// Deterministic generator: the same seed always produces the same
    /// roster and the same rendered bytes.
    pub fn with_seed(employee_count: usize, seed: u64) -> Self {
        Self::from_rng(employee_count, StdRng::seed_from_u64(seed))
    }

    fn from_rng(employee_count: usize, rng: StdRng) -> Self {
        Self {
            employee_count,
            dependent_count: 0,
            ward_count: 0,
            rng,
        }
    }

    /// Dependents generated so far.
    pub fn dependent_count(&self) -> usize {
        self.dependent_count
    }

    /// Wards generated so far.
    pub fn ward_count(&self) -> usize {
        self.ward_count
    }

    /// Generate the roster: each employee followed by their dependents.
    pub fn generate(&mut self) -> Vec<Enrollee> {
        let mut roster = Vec::new();
        for _ in 0..self.employee_count {
            let sponsor = self.employee();
            let (spouses, children) = POPULATION[self.rng.gen_range(0..POPULATION.len())];
            roster.push(sponsor.clone());

            for _ in 0..spouses {
                self.dependent_count += 1;
                roster.push(self.spouse(&sponsor));
            }
            for _ in 0..children {
                self.dependent_count += 1;
                let mut child = self.child(&sponsor);
                if self.dependent_count % WARD_CADENCE == 0 {
                    self.ward_count += 1;
                    child.relationship_code = RELATIONSHIP_WARD.to_owned();
                }
                roster.push(child);
            }
        }
        debug!(
            employees = self.employee_count,
            dependents = self.dependent_count,
            wards = self.ward_count,
            "generated roster"
        );
        roster
    }

    /// Generate a roster and render it as one complete feed.
    ///
    /// Returns the number of enrollees rendered.
    pub fn render<W: Write>(&mut self, out: &mut W) -> io::Result<usize> {
        let roster = self.generate();
        self.render_roster(&roster, out)?;
        Ok(roster.len())
    }

    /// Render an envelope followed by one segment group per enrollee.
    /// Useful on its own for splitting one roster across part files.
    pub fn render_roster<W: Write>(&mut self, roster: &[Enrollee], out: &mut W) -> io::Result<()> {
        self.render_envelope(out)?;
        for enrollee in roster {
            self.render_enrollee(enrollee, out)?;
        }
        Ok(())
    }

    fn render_envelope<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let now = Utc::now();
        let control = digits(&mut self.rng, 9);
        writeln!(
            out,
            "ISA*00*          *00*          *ZZ*SPONSOR        *ZZ*CARRIER        \
             *{date}*{time}*^*00501*{control}*0*P*:",
            date = now.format("%y%m%d"),
            time = now.format("%H%M"),
        )?;
        writeln!(
            out,
            "GS*BE*SPONSOR*CARRIER*{date}*{time}*1*X*005010X220A1",
            date = now.format("%Y%m%d"),
            time = now.format("%H%M"),
        )?;
        writeln!(out, "ST*834*0001*005010X220A1")?;
        writeln!(
            out,
            "BGN*00*{reference}*{date}*{time}****4",
            reference = digits(&mut self.rng, 8),
            date = now.format("%Y%m%d"),
            time = now.format("%H%M"),
        )?;
        writeln!(out, "N1*P5*SPONSOR*FI*{}", digits(&mut self.rng, 9))?;
        writeln!(out, "N1*IN*CARRIER*FI*{}", digits(&mut self.rng, 9))
    }

    fn render_enrollee<W: Write>(&mut self, person: &Enrollee, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "INS*{primary}*{relationship}*030*XN*A***{ft}**N",
            primary = if person.primary { "Y" } else { "N" },
            relationship = person.relationship_code,
            ft = person.ft_status,
        )?;
        writeln!(out, "REF*0F*{}", person.subscriber_number)?;
        writeln!(out, "REF*1L*{}", person.benefit_number)?;
        writeln!(out, "REF*DX*{}", person.plan_number)?;
        writeln!(out, "DTP*356*D8*{}", Utc::now().format("%Y%m%d"))?;
        writeln!(
            out,
            "NM1*IL*1*{last}*{first}*{mi}***34*{ssn}",
            last = person.last_name,
            first = person.first_name,
            mi = person.middle_initial,
            ssn = person.ssn,
        )?;
        writeln!(
            out,
            "PER*IP**HP*{home}*CP*{cell}*EM*{email}",
            home = person.home_phone,
            cell = person.cell_phone,
            email = person.email,
        )?;
        writeln!(out, "N3*{}*{}", person.street_address, person.apt_number)?;
        writeln!(
            out,
            "N4*{city}*{state}*{zip}",
            city = person.city,
            state = person.state,
            zip = person.zipcode,
        )?;
        writeln!(
            out,
            "DMG*D8*{birthdate}*{gender}",
            birthdate = person.birthdate,
            gender = person.gender,
        )?;
        writeln!(
            out,
            "HD*030**HLT*{plan}*{coverage}",
            plan = person.plan_number,
            coverage = person.coverage_type,
        )?;
        writeln!(out, "AMT*D2*{}", person.premium)
    }

    fn employee(&mut self) -> Enrollee {
        let rng = &mut self.rng;
        Enrollee {
            primary: true,
            ft_status: "FT".to_owned(),
            subscriber_number: digits(rng, 9),
            benefit_number: digits(rng, 8),
            relationship_code: RELATIONSHIP_SELF.to_owned(),
            first_name: upper(FirstName().fake_with_rng::<String, _>(rng)),
            last_name: upper(LastName().fake_with_rng::<String, _>(rng)),
            middle_initial: rng.gen_range(b'A'..=b'Z') as char,
            ssn: digits(rng, 9),
            email: upper(FreeEmail().fake_with_rng::<String, _>(rng)),
            home_phone: digits(rng, 10),
            cell_phone: digits(rng, 10),
            street_address: upper(format!(
                "{} {}",
                BuildingNumber().fake_with_rng::<String, _>(rng),
                StreetName().fake_with_rng::<String, _>(rng),
            )),
            // two in three enrollees have no secondary address line
            apt_number: if rng.gen_range(0..3) == 0 {
                upper(SecondaryAddress().fake_with_rng::<String, _>(rng))
            } else {
                String::new()
            },
            city: upper(CityName().fake_with_rng::<String, _>(rng)),
            state: StateAbbr().fake_with_rng::<String, _>(rng),
            zipcode: ZipCode().fake_with_rng::<String, _>(rng),
            gender: if rng.gen_bool(0.5) { 'M' } else { 'F' },
            birthdate: birthdate(rng, 7_000, 25_000),
            plan_number: PLAN_NUMBERS[rng.gen_range(0..PLAN_NUMBERS.len())].to_owned(),
            coverage_type: COVERAGE_TYPES[rng.gen_range(0..COVERAGE_TYPES.len())].to_owned(),
            premium: format!(
                "{}.{:02}",
                rng.gen_range(80..900),
                rng.gen_range(0..100u32)
            ),
        }
    }

    /// Dependents share the sponsor's subscriber number, plan and address,
    /// and carry no employment status or coverage tier of their own.
    fn dependent(&mut self, sponsor: &Enrollee, relationship: &str) -> Enrollee {
        let mut dependent = self.employee();
        dependent.primary = false;
        dependent.ft_status = String::new();
        dependent.relationship_code = relationship.to_owned();
        dependent.subscriber_number = sponsor.subscriber_number.clone();
        dependent.plan_number = sponsor.plan_number.clone();
        dependent.street_address = sponsor.street_address.clone();
        dependent.apt_number = sponsor.apt_number.clone();
        dependent.city = sponsor.city.clone();
        dependent.state = sponsor.state.clone();
        dependent.zipcode = sponsor.zipcode.clone();
        dependent.coverage_type = String::new();
        dependent
    }

    fn spouse(&mut self, sponsor: &Enrollee) -> Enrollee {
        let relationship = if self.rng.gen_bool(0.5) {
            RELATIONSHIP_SPOUSE
        } else {
            RELATIONSHIP_PARTNER
        };
        self.dependent(sponsor, relationship)
    }

    fn child(&mut self, sponsor: &Enrollee) -> Enrollee {
        let mut child = self.dependent(sponsor, RELATIONSHIP_CHILD);
        child.birthdate = birthdate(&mut self.rng, 30, 7_000);
        child
    }
}

fn digits(rng: &mut StdRng, count: usize) -> String {
    (0..count)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

fn birthdate(rng: &mut StdRng, min_days_ago: i64, max_days_ago: i64) -> String {
    let date = Utc::now().date_naive() - Duration::days(rng.gen_range(min_days_ago..max_days_ago));
    date.format("%Y%m%d").to_string()
}

fn upper(value: String) -> String {
    value.to_uppercase()
}
