//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! Bundled English gazetteers for the entity swaps and the dictionary tagger.
//!
//! The lists are disjoint: no first name is also a location, so swapping an
//! entity never changes the label the tagger assigns to it.

pub const FIRST_NAMES: &[&str] = &[
    "Anthony", "Kevin", "Michael", "James", "John", "Robert", "David", "William",
    "Richard", "Joseph", "Thomas", "Charles", "Daniel", "Matthew", "Steven", "Andrew",
    "Joshua", "Brian", "Ryan", "Jacob", "Mary", "Patricia", "Jennifer", "Linda",
    "Elizabeth", "Barbara", "Susan", "Jessica", "Sarah", "Karen", "Nancy", "Lisa",
    "Emily", "Emma", "Olivia", "Sophia", "Laura", "Rachel", "Hannah", "Grace",
];

pub const LAST_NAMES: &[&str] = &[
    "Davis", "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller",
    "Wilson", "Moore", "Taylor", "Anderson", "Jackson", "Harris", "Martin", "Thompson",
    "Martinez", "Robinson", "Clark", "Lewis", "Walker", "Hall", "Allen", "Wright",
    "Scott", "Baker", "Adams", "Nelson", "Carter", "Mitchell", "Roberts", "Turner",
    "Phillips", "Campbell", "Parker", "Evans", "Edwards", "Collins", "Stewart", "Morris",
];

pub const LOCATIONS: &[&str] = &[
    "Dallas", "Houston", "Chicago", "Boston", "Seattle", "Denver", "Atlanta", "Miami",
    "New York", "Los Angeles", "San Francisco", "San Diego", "Las Vegas", "London",
    "Paris", "Berlin", "Madrid", "Rome", "Tokyo", "Beijing", "Shanghai", "Sydney",
    "Toronto", "Vancouver", "Mumbai", "Cairo", "Moscow", "Dublin", "Canada", "Mexico",
    "Brazil", "France", "Germany", "Spain", "Italy", "Japan", "China", "India",
    "Australia", "Egypt", "Kenya", "Norway", "Sweden", "Ireland", "United States",
    "United Kingdom", "South Africa",
];
