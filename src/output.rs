//! Console rendering of query results. Successful results go to stdout,
//! failures to stderr; `--json` mode prints one pretty object per result.

use btksorgu_core::{now_rfc3339, BatchSummary, QueryResult};

const HEAVY_RULE: &str =
    "════════════════════════════════════════════════════════════";
const LIGHT_RULE: &str =
    "────────────────────────────────────────────────────────────";

pub fn print_result(result: &QueryResult) {
    if !result.status {
        eprintln!("{} sorgulanırken hata: {}", result.domain, result.error);
        return;
    }

    println!();
    println!("{HEAVY_RULE}");
    println!("Domain: {}", result.domain);
    if result.query_duration_ms > 0 {
        println!("Sorgu Süresi: {}", result.query_duration_formatted);
    }
    println!("{HEAVY_RULE}");

    if result.blocked {
        println!("Durum: ENGELLİ");
        println!("{LIGHT_RULE}");

        if !result.decision_date.is_empty() {
            println!("Karar Tarihi: {}", result.decision_date);
        }
        if !result.file_number.is_empty() {
            println!("Dosya Numarası: {}", result.file_number);
        }
        if !result.file_type.is_empty() {
            println!("Dosya Türü: {}", result.file_type);
        }
        if !result.court.is_empty() {
            println!("Mahkeme: {}", result.court);
        }

        println!("{LIGHT_RULE}");

        if !result.description_local.is_empty() {
            println!();
            println!("Türkçe Açıklama:");
            println!("   {}", result.description_local);
        }
        if !result.description_foreign.is_empty() {
            println!();
            println!("English Description:");
            println!("   {}", result.description_foreign);
        }
    } else {
        println!("Durum: ERİŞİLEBİLİR");
        println!("{LIGHT_RULE}");
        println!("Bu site hakkında herhangi bir engel kararı bulunmamaktadır.");
    }

    println!("{HEAVY_RULE}");
    println!();
}

pub fn print_summary(summary: &BatchSummary) {
    println!();
    println!("ÖZET");
    println!("{HEAVY_RULE}");
    println!("   Engelli: {}", summary.blocked);
    println!("   Erişilebilir: {}", summary.accessible);
    if summary.failed > 0 {
        println!("   Hatalı: {}", summary.failed);
    }
    if summary.skipped > 0 {
        println!("   Geçersiz (atlandı): {}", summary.skipped);
    }
    println!("{HEAVY_RULE}");
}

pub fn print_json(result: &QueryResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("JSON çıktısı üretilemedi: {e}"),
    }
}

pub fn print_json_error(domain: &str, message: &str) {
    let result = QueryResult {
        domain: domain.to_string(),
        timestamp: now_rfc3339(),
        status: false,
        error: message.to_string(),
        ..Default::default()
    };
    print_json(&result);
}
