// ==========================================
// 测试数据构建器 - 部件
// ==========================================
#![allow(dead_code)]

use wcm_ledger::domain::NewAssetPart;

pub struct PartBuilder {
    asset_id: String,
    part_number: String,
    part_name: String,
    classification: Option<String>,
    frequency_pm: Option<String>,
    frequency_am: Option<String>,
    smp_number: Option<i64>,
    vendor: Option<String>,
}

impl PartBuilder {
    pub fn new(asset_id: &str, part_number: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            part_number: part_number.to_string(),
            part_name: format!("Part {}", part_number),
            classification: Some("A".to_string()),
            frequency_pm: None,
            frequency_am: None,
            smp_number: None,
            vendor: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.part_name = name.to_string();
        self
    }

    pub fn class(mut self, classification: &str) -> Self {
        self.classification = Some(classification.to_string());
        self
    }

    pub fn pm(mut self, code: &str) -> Self {
        self.frequency_pm = Some(code.to_string());
        self
    }

    pub fn am(mut self, code: &str) -> Self {
        self.frequency_am = Some(code.to_string());
        self
    }

    pub fn smp(mut self, smp_number: i64) -> Self {
        self.smp_number = Some(smp_number);
        self
    }

    pub fn vendor(mut self, vendor: &str) -> Self {
        self.vendor = Some(vendor.to_string());
        self
    }

    pub fn build(self) -> NewAssetPart {
        NewAssetPart {
            asset_id: self.asset_id,
            part_number: Some(self.part_number),
            part_name: Some(self.part_name),
            component_classification: self.classification,
            frequency_pm: self.frequency_pm,
            frequency_am: self.frequency_am,
            smp_number: self.smp_number,
            vendor: self.vendor,
            ..Default::default()
        }
    }
}

impl From<PartBuilder> for NewAssetPart {
    fn from(builder: PartBuilder) -> Self {
        builder.build()
    }
}
