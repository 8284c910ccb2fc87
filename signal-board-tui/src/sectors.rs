//! Sector watch lists used to group tickers on the dashboard

use signal_board::{SymbolMap, SymbolRecord, Ticker};
use std::collections::HashSet;

/// Named watch list of tickers, rendered as one table
#[derive(Debug, Clone, Copy)]
pub struct Sector {
    pub name: &'static str,
    pub tickers: &'static [&'static str],
}

/// Tickers present in the snapshot but not listed in any sector
pub const OTHER_SECTOR: &str = "Other";

pub const SECTORS: &[Sector] = &[
    Sector {
        name: "Tech Leaders",
        tickers: &[
            "TSLA", "NVDA", "AAPL", "AMZN", "META", "NFLX", "ORCL", "PLTR", "MU", "AMD", "AVGO",
            "TSM", "QCOM", "ADBE", "DIS",
        ],
    },
    Sector {
        name: "NVIDIA Portfolio",
        tickers: &["NVDA", "APLD", "CRWV", "NBIS", "ARM", "WRD", "RXRX"],
    },
    Sector {
        name: "Nuclear",
        tickers: &["SMR", "OKLO", "UUUU", "NEE", "VST", "UEC", "NXE", "DJT", "LEU"],
    },
    Sector {
        name: "Quantum Computing",
        tickers: &["QBTS", "RGTI", "IONQ", "QUBT", "LAES"],
    },
    Sector {
        name: "AI Software",
        tickers: &[
            "PLTR", "SOUN", "PATH", "TTD", "PINS", "ZETA", "TEM", "SHOP", "DOCU", "FIG", "RDDT",
            "SNOW", "MDB",
        ],
    },
    Sector {
        name: "Trump Trade",
        tickers: &[
            "TSLA", "MARA", "DJT", "MSTR", "XOM", "CLSK", "RIOT", "COIN", "RUM", "UNH",
        ],
    },
    Sector {
        name: "Autonomous Driving",
        tickers: &["TSLA", "UBER"],
    },
    Sector {
        name: "AI Chips",
        tickers: &["INTC", "NVDA", "TSM"],
    },
    Sector {
        name: "Crypto",
        tickers: &[
            "ASST", "SOFI", "BMNR", "BTBT", "BITF", "MARA", "MSTR", "IREN", "CLSK", "HOOD", "HIVE",
            "RIOT", "WULF", "CIFR", "GME", "COIN", "CRCL", "SBET", "GLXY", "HUT", "BTDR", "DJT",
        ],
    },
    Sector {
        name: "Robotics",
        tickers: &["TSLA", "MBLY", "PATH", "RR", "SERV", "PDYN"],
    },
    Sector {
        name: "Drones",
        tickers: &["ONDS", "ACHR", "JOBY", "RCAT", "KTOS", "UMAC", "AVAV"],
    },
    Sector {
        name: "Artificial Intelligence",
        tickers: &["NVDA", "INTC", "SMCI", "NVTS", "AMD", "TSM", "AVGO", "QCOM"],
    },
    Sector {
        name: "Semiconductors",
        tickers: &[
            "INTC", "NVDA", "MU", "AMD", "AVGO", "LRCX", "TSM", "AMAT", "SMCI", "NVTS",
        ],
    },
    Sector {
        name: "Space",
        tickers: &[
            "RKLB", "ASTS", "SIDU", "RDW", "PL", "LUNR", "SATS", "VSAT", "DXYZ", "FJET",
        ],
    },
    Sector {
        name: "Rare Earths",
        tickers: &["CRML", "UAMY", "UUUU", "MP", "USAR", "AREC", "NB", "EOSE"],
    },
    Sector {
        name: "Lithium & Batteries",
        tickers: &["LAC", "QS", "LAR", "ENVX", "SGML", "ALAB"],
    },
    Sector {
        name: "Memory & Storage",
        tickers: &["MU", "SNDK", "WDC", "STX"],
    },
];

/// One table of the dashboard: sector name and its rows in watch-list order.
///
/// Listed tickers without a record yet are kept (as `None`) so the table shape is stable.
#[derive(Debug, Clone)]
pub struct SectorView<'a> {
    pub name: &'a str,
    pub rows: Vec<(Ticker, Option<&'a SymbolRecord>)>,
}

/// Group a snapshot by sector. Tickers may appear in several sectors.
pub fn group_by_sector<'a>(sectors: &'a [Sector], snapshot: &'a SymbolMap) -> Vec<SectorView<'a>> {
    let mut listed = HashSet::new();

    let mut views = sectors
        .iter()
        .filter(|sector| !sector.tickers.is_empty())
        .map(|sector| SectorView {
            name: sector.name,
            rows: sector
                .tickers
                .iter()
                .map(|ticker| {
                    let ticker = Ticker::from(*ticker);
                    let record = snapshot.get(&ticker);
                    listed.insert(ticker.clone());
                    (ticker, record)
                })
                .collect(),
        })
        .collect::<Vec<_>>();

    let other = snapshot
        .iter()
        .filter(|(ticker, _)| !listed.contains(*ticker))
        .map(|(ticker, record)| (ticker.clone(), Some(record)))
        .collect::<Vec<_>>();

    if !other.is_empty() {
        views.push(SectorView {
            name: OTHER_SECTOR,
            rows: other,
        });
    }

    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use signal_board::IntervalTable;

    fn snapshot(tickers: &[&str]) -> SymbolMap {
        tickers
            .iter()
            .map(|ticker| {
                (
                    Ticker::from(*ticker),
                    SymbolRecord::new(&IntervalTable::default(), Utc::now()),
                )
            })
            .collect()
    }

    #[test]
    fn test_group_by_sector() {
        const TEST_SECTORS: &[Sector] = &[
            Sector {
                name: "Chips",
                tickers: &["NVDA", "AMD"],
            },
            Sector {
                name: "Empty",
                tickers: &[],
            },
            Sector {
                name: "Cars",
                tickers: &["TSLA", "NVDA"],
            },
        ];

        let snapshot = snapshot(&["NVDA", "TSLA", "GME", "AAPL"]);
        let views = group_by_sector(TEST_SECTORS, &snapshot);

        let names = views.iter().map(|view| view.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["Chips", "Cars", OTHER_SECTOR]);

        let chips = &views[0].rows;
        assert_eq!(chips[0].0, Ticker::from("NVDA"));
        assert!(chips[0].1.is_some());
        assert_eq!(chips[1].0, Ticker::from("AMD"));
        assert!(chips[1].1.is_none());

        let other = views[2]
            .rows
            .iter()
            .map(|(ticker, _)| ticker.as_str())
            .collect::<Vec<_>>();
        assert_eq!(other, vec!["AAPL", "GME"]);
    }

    #[test]
    fn test_group_by_sector_no_other_when_all_listed() {
        let snapshot = snapshot(&["NVDA", "TSLA"]);
        let views = group_by_sector(SECTORS, &snapshot);

        assert_eq!(views.len(), SECTORS.len());
        assert!(views.iter().all(|view| view.name != OTHER_SECTOR));
    }
}
