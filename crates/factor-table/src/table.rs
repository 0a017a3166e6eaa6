//! Static bullish/bearish narrative lines per ticker.

pub(crate) struct StaticFactors {
    pub positive: &'static [&'static str],
    pub negative: &'static [&'static str],
}

pub(crate) fn lookup(symbol: &str) -> Option<&'static StaticFactors> {
    match symbol {
        "TSLA" => Some(&TSLA),
        "NVDA" => Some(&NVDA),
        _ => None,
    }
}

static TSLA: StaticFactors = StaticFactors {
    positive: &[
        "로보택시 이벤트 기대감: 10월 완전자율주행 데모로 FSD 기술력 입증 기대",
        "에너지 사업 급성장: 메가팩 Q3 매출 37% 증가, 전력망 저장 수요 폭증",
        "사이버트럭 생산 확대: 월간 1,000대 돌파로 픽업트럭 시장 본격 진입",
        "NACS 충전 표준 확산: GM, 포드 등 주요 OEM 채택으로 충전 인프라 독점",
        "중국 시장 회복: 상하이 기가팩토리 정상화 및 현지 판매 증가 추세",
        "AI 로봇 사업화: 옵티머스 휴머노이드 로봇의 공장 자동화 적용 기대",
        "재무 건전성: 현금 290억 달러 보유로 경기 둔화에도 안정적 운영",
        "EV 시장 선도: 프리미엄 전기차 브랜드 1위 지위 지속 유지",
    ],
    negative: &[
        "중국 EV 경쟁 심화: BYD, 샤오미 등의 공격적 가격정책으로 점유율 위험",
        "전기차 수요 둔화: 글로벌 EV 성장률 둔화로 2024년 한 자리수 성장 예상",
        "유럽 시장 침체: 독일, 프랑스 EV 보조금 종료로 판매량 20% 감소",
        "머스크 정치 리스크: 트럼프 지지 발언으로 ESG 투자자 이탈 우려",
        "FSD 기술 완성도: NHTSA 조사 지속으로 로보택시 상용화 지연 가능성",
        "고평가 우려: PER 60배 이상으로 실적 부진시 주가 급락 위험",
        "공급망 차질: 반도체 부족과 원자재 가격 상승으로 생산비용 증가",
        "전통 브랜드 추격: BMW, 아우디 등 고급 EV 출시로 경쟁 심화",
        "거시경제 위험: 경기 침체시 고가 내구재 수요 급감 가능성",
        "품질 이슈: FSD 결함과 리콜로 브랜드 신뢰도 하락 우려",
    ],
};

static NVDA: StaticFactors = StaticFactors {
    positive: &[
        "AI 칩 수요 폭증: ChatGPT 등 생성AI 붐으로 데이터센터 GPU 수요 급증",
        "Blackwell 아키텍처: 차세대 AI 칩으로 성능 대폭 향상, 경쟁 우위 유지",
        "CUDA 생태계 독점: 수백만 개발자 기반으로 소프트웨어 락인 구조 형성",
        "클라우드 확장: AWS, Azure, GCP의 AI 인프라 투자 확대로 수혜",
        "자율주행 협력: 테슬라, 웨이모 등과 파트너십으로 새로운 성장 동력",
        "메타버스 진출: 옴니버스 플랫폼으로 가상현실 콘텐츠 제작 도구 선점",
        "데이터센터 혁신: Grace CPU와 통합 솔루션으로 전체 시스템 최적화",
        "높은 마진률: 70% 이상 제품 마진으로 안정적 수익 창출 구조",
    ],
    negative: &[
        "중국 수출 제재: 미국 정부의 고성능 칩 수출 금지로 중국 매출 타격",
        "경쟁사 추격: AMD MI300, 인텔 Gaudi 등 경쟁 제품 출시로 점유율 위험",
        "고객사 자체 칩: 구글 TPU, 아마존 Trainium 등으로 의존도 감소",
        "AI 버블 우려: 생성AI 과열 논란으로 수요 지속성에 대한 의문 제기",
        "밸류에이션 부담: PER 고점 도달로 실적 둔화시 주가 조정 압력",
        "공급망 리스크: TSMC 의존과 대만 지정학 위험으로 생산 차질 우려",
        "거시경제 영향: 금리 상승으로 기술주 투자 심리 위축",
        "규제 리스크: AI 독점 우려로 반독점 조사 가능성 증대",
        "암호화폐 변동성: 채굴 수요 급변으로 게이밍 GPU 매출 불안정",
        "데이터센터 포화: 클라우드 업체들의 과도한 투자로 수요 둔화 우려",
    ],
};

/// Generic lines for tickers without a bespoke entry. The first line of each
/// list is prefixed with the ticker.
pub(crate) const FALLBACK_POSITIVE_LEAD: &str = "긍정적 시장 전망과 기술 혁신 지속";
pub(crate) const FALLBACK_POSITIVE: &[&str] = &[
    "강력한 재무 구조와 안정적 현금흐름 유지",
    "시장 지배력과 브랜드 가치 상승",
    "새로운 성장 동력과 사업 다각화",
    "경쟁 우위 기술력과 특허 포트폴리오",
    "글로벌 확장과 신흥시장 진출",
    "ESG 경영과 지속가능성 리더십",
    "주주 친화적 정책과 배당 증액",
];

pub(crate) const FALLBACK_NEGATIVE_LEAD: &str = "거시경제 불확실성과 시장 변동성";
pub(crate) const FALLBACK_NEGATIVE: &[&str] = &[
    "경쟁 심화와 시장 포화 우려",
    "규제 리스크와 정부 정책 변화",
    "공급망 차질과 원자재 가격 상승",
    "고평가 우려와 밸류에이션 부담",
    "기술 변화와 디지털 전환 압박",
    "지정학적 리스크와 무역 갈등",
    "인재 확보 어려움과 임금 상승 압력",
    "환경 규제 강화와 탄소중립 비용",
    "사이버 보안 위협과 데이터 보호 이슈",
];
