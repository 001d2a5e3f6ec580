/// Firebird client encoding matching the local database encoding.
///
/// Most local encoding names are understood by Firebird directly or as an
/// alias. The few that are not get rewritten, anything else is passed
/// through and left for the remote side to reject.
pub fn client_encoding(database_encoding: &str) -> &str {
    match database_encoding {
        "SQL_ASCII" => "NONE",
        "ISO_8859_5" => "ISO8859_5",
        "ISO_8859_6" => "ISO8859_6",
        "ISO_8859_7" => "ISO8859_7",
        "ISO_8859_8" => "ISO8859_8",
        "WIN866" => "DOS866",
        // Assumed close enough, JIS X 0212 may not round trip.
        "EUC_JP" => "EUJC_0208",
        other => other,
    }
}
