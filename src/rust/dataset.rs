//! Labeled transaction data: the built-in sample corpus and CSV loading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{CategorizerError, LabeledExample};

/// Ten spending categories with twenty example transactions each.
const SAMPLE_TRANSACTIONS: &[(&str, &str)] = &[
    // Food
    ("Swiggy order 450", "Food"), ("Zomato payment 320", "Food"), ("McDonald's 250", "Food"), ("Dominos Pizza 599", "Food"),
    ("Starbucks Coffee 180", "Food"), ("KFC Chicken 399", "Food"), ("Subway sandwich 200", "Food"), ("Pizza Hut 550", "Food"),
    ("Cafe Coffee Day 150", "Food"), ("Burger King 300", "Food"), ("Haldirams 280", "Food"), ("Food panda 420", "Food"),
    ("Restaurant bill 850", "Food"), ("Dinner at Hotel 1200", "Food"), ("Lunch expense 300", "Food"), ("Breakfast cafe 180", "Food"),
    ("Swiggy Genie 50", "Food"), ("Zomato Pro 299", "Food"), ("Biryani order 400", "Food"), ("Chinese food 350", "Food"),
    // Travel
    ("Uber ride 300", "Travel"), ("Ola cab 250", "Travel"), ("Rapido bike 80", "Travel"), ("Metro card recharge 500", "Travel"),
    ("Petrol pump 2000", "Travel"), ("Fuel expense 1500", "Travel"), ("Bus ticket 50", "Travel"), ("Train ticket 350", "Travel"),
    ("Auto rickshaw 120", "Travel"), ("Taxi fare 450", "Travel"), ("Parking fee 50", "Travel"), ("Toll tax 100", "Travel"),
    ("Uber Moto 60", "Travel"), ("Ola Auto 90", "Travel"), ("Flight booking 8500", "Travel"), ("IndiGo airlines 6500", "Travel"),
    ("Rapido Auto 100", "Travel"), ("Metro ticket 40", "Travel"), ("Bike rental 200", "Travel"), ("Car service 5000", "Travel"),
    // Shopping
    ("Amazon purchase 1299", "Shopping"), ("Flipkart order 899", "Shopping"), ("Myntra clothing 1599", "Shopping"), ("Ajio fashion 2100", "Shopping"),
    ("Big Bazaar 650", "Shopping"), ("Reliance Trends 1200", "Shopping"), ("Decathlon sports 3500", "Shopping"), ("Nike store 4500", "Shopping"),
    ("Lifestyle store 2800", "Shopping"), ("Shopper Stop 1900", "Shopping"), ("Electronics shop 15000", "Shopping"), ("Mobile purchase 25000", "Shopping"),
    ("Laptop bought 45000", "Shopping"), ("Headphones 2500", "Shopping"), ("Grocery shopping 1200", "Shopping"), ("Supermarket 850", "Shopping"),
    ("Online shopping 999", "Shopping"), ("Clothing store 1800", "Shopping"), ("Shoes purchase 3200", "Shopping"), ("Watch bought 5500", "Shopping"),
    // Entertainment
    ("Netflix subscription 649", "Entertainment"), ("Amazon Prime 299", "Entertainment"), ("Disney Hotstar 499", "Entertainment"), ("Spotify Premium 119", "Entertainment"),
    ("PVR movie tickets 600", "Entertainment"), ("INOX cinema 450", "Entertainment"), ("BookMyShow 800", "Entertainment"), ("Concert tickets 2500", "Entertainment"),
    ("Gaming subscription 799", "Entertainment"), ("YouTube Premium 129", "Entertainment"), ("Apple Music 99", "Entertainment"), ("Movie outing 1200", "Entertainment"),
    ("Theatre tickets 350", "Entertainment"), ("Gaming purchase 1999", "Entertainment"), ("PlayStation game 3500", "Entertainment"), ("Xbox pass 699", "Entertainment"),
    ("Theme park 1500", "Entertainment"), ("Water park entry 800", "Entertainment"), ("Museum ticket 200", "Entertainment"), ("Zoo entry 100", "Entertainment"),
    // Utilities
    ("Electricity bill 1500", "Utilities"), ("Water bill 300", "Utilities"), ("Gas cylinder 850", "Utilities"), ("Internet bill 799", "Utilities"),
    ("Mobile recharge 299", "Utilities"), ("DTH recharge 350", "Utilities"), ("Broadband payment 999", "Utilities"), ("Phone bill 550", "Utilities"),
    ("Airtel recharge 399", "Utilities"), ("Jio prepaid 239", "Utilities"), ("Vi postpaid 499", "Utilities"), ("BSNL bill 450", "Utilities"),
    ("WiFi payment 700", "Utilities"), ("Landline bill 200", "Utilities"), ("Maintenance charge 3500", "Utilities"), ("Society bill 2000", "Utilities"),
    ("LPG booking 900", "Utilities"), ("Electricity payment 1800", "Utilities"), ("Water charges 250", "Utilities"), ("Municipal tax 5000", "Utilities"),
    // Healthcare
    ("Apollo Pharmacy 450", "Healthcare"), ("Medicine purchase 680", "Healthcare"), ("Doctor consultation 800", "Healthcare"), ("Hospital bill 5500", "Healthcare"),
    ("Medical test 2200", "Healthcare"), ("Lab report 1500", "Healthcare"), ("Health checkup 3000", "Healthcare"), ("Dental clinic 1200", "Healthcare"),
    ("Eye checkup 500", "Healthcare"), ("Physiotherapy 800", "Healthcare"), ("Medical store 350", "Healthcare"), ("Health insurance 8500", "Healthcare"),
    ("Clinic visit 600", "Healthcare"), ("Surgery payment 25000", "Healthcare"), ("X-ray 800", "Healthcare"), ("MRI scan 4500", "Healthcare"),
    ("Blood test 600", "Healthcare"), ("Pharmacy bill 520", "Healthcare"), ("Ayurvedic medicine 400", "Healthcare"), ("Health supplements 900", "Healthcare"),
    // Education
    ("Course fee 15000", "Education"), ("Book purchase 850", "Education"), ("Udemy course 799", "Education"), ("Coursera subscription 3999", "Education"),
    ("School fee 25000", "Education"), ("Tuition payment 5000", "Education"), ("Stationery shop 450", "Education"), ("Notebook 120", "Education"),
    ("Exam fee 1500", "Education"), ("Online class 2500", "Education"), ("Coaching center 8000", "Education"), ("University fee 50000", "Education"),
    ("Library membership 500", "Education"), ("Study material 650", "Education"), ("Educational app 299", "Education"), ("Skill course 4999", "Education"),
    ("Training program 12000", "Education"), ("Workshop fee 3500", "Education"), ("Seminar registration 1200", "Education"), ("Certification 8500", "Education"),
    // Personal Care
    ("Salon visit 600", "Personal Care"), ("Haircut 250", "Personal Care"), ("Spa treatment 2500", "Personal Care"), ("Gym membership 3000", "Personal Care"),
    ("Fitness center 1500", "Personal Care"), ("Yoga class 800", "Personal Care"), ("Beauty parlour 1200", "Personal Care"), ("Grooming 450", "Personal Care"),
    ("Cosmetics 850", "Personal Care"), ("Perfume 1800", "Personal Care"), ("Skincare products 1200", "Personal Care"), ("Haircare 600", "Personal Care"),
    ("Gym equipment 5000", "Personal Care"), ("Protein powder 2500", "Personal Care"), ("Supplements 1500", "Personal Care"), ("Massage 1000", "Personal Care"),
    ("Manicure pedicure 400", "Personal Care"), ("Facial 800", "Personal Care"), ("Hair color 1500", "Personal Care"), ("Personal trainer 5000", "Personal Care"),
    // Investment
    ("Mutual fund SIP 5000", "Investment"), ("Stock purchase 10000", "Investment"), ("Fixed deposit 50000", "Investment"), ("PPF deposit 20000", "Investment"),
    ("Insurance premium 8500", "Investment"), ("Life insurance 12000", "Investment"), ("Gold purchase 25000", "Investment"), ("Savings account 15000", "Investment"),
    ("Investment app 3000", "Investment"), ("Zerodha trading 8000", "Investment"), ("Groww investment 5000", "Investment"), ("SIP payment 10000", "Investment"),
    ("Recurring deposit 2000", "Investment"), ("NPS contribution 5000", "Investment"), ("ELSS fund 15000", "Investment"), ("Equity investment 20000", "Investment"),
    ("Bonds purchase 30000", "Investment"), ("Real estate 500000", "Investment"), ("Crypto investment 5000", "Investment"), ("Portfolio 25000", "Investment"),
    // Miscellaneous
    ("ATM withdrawal 5000", "Miscellaneous"), ("Bank charges 150", "Miscellaneous"), ("Credit card bill 8500", "Miscellaneous"), ("Loan EMI 12000", "Miscellaneous"),
    ("Gift purchase 1500", "Miscellaneous"), ("Donation 1000", "Miscellaneous"), ("Charity 500", "Miscellaneous"), ("Pet supplies 800", "Miscellaneous"),
    ("Vet visit 1200", "Miscellaneous"), ("Plant nursery 400", "Miscellaneous"), ("Home decor 2500", "Miscellaneous"), ("Furniture 15000", "Miscellaneous"),
    ("Appliance repair 800", "Miscellaneous"), ("Plumber 600", "Miscellaneous"), ("Electrician 500", "Miscellaneous"), ("Carpenter 1200", "Miscellaneous"),
    ("Courier charges 100", "Miscellaneous"), ("Post office 50", "Miscellaneous"), ("Legal fee 5000", "Miscellaneous"), ("Consultant 3000", "Miscellaneous"),
];

/// Returns the built-in labeled corpus (200 transactions, 10 categories).
pub fn sample_dataset() -> Vec<LabeledExample> {
    SAMPLE_TRANSACTIONS
        .iter()
        .map(|&(text, category)| LabeledExample::new(text, category))
        .collect()
}

/// Reads labeled examples from a CSV file with a `transaction,category` header.
///
/// # Errors
/// `Dataset` if the file cannot be opened or a row is malformed.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<LabeledExample>, CategorizerError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| CategorizerError::Dataset(format!("Failed to open {:?}: {}", path, e)))?;
    let examples = read_csv(file)?;
    log::info!("Read {} labeled examples from {:?}", examples.len(), path);
    Ok(examples)
}

/// Reads labeled examples from CSV data. The text column may be named
/// `transaction` or `text`.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<LabeledExample>, CategorizerError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut examples = Vec::new();
    for (row, record) in rdr.deserialize::<LabeledExample>().enumerate() {
        let example = record.map_err(|e| {
            CategorizerError::Dataset(format!("Row {}: {}", row + 1, e))
        })?;
        examples.push(example);
    }
    Ok(examples)
}
